//! End-to-end tests: resolve settings, provision the experiment directory and
//! snapshot sources inside a temporary project.

use std::fs;
use std::path::Path;

use bgan_core::snapshot::snapshot_sources;
use bgan_core::{
    BganError, ConfigError, ConfigResolver, DirRole, NetworkRole, Overrides, ResolvedConfig,
    Settings, TrainingPhase,
};
use pretty_assertions::assert_eq;

fn make_project(root: &Path) {
    fs::write(root.join("config.py"), "SETUP = {}\n").unwrap();
    fs::write(root.join("train.py"), "train()\n").unwrap();
    fs::create_dir_all(root.join("bgan/presets/refiner")).unwrap();
    fs::write(root.join("bgan/models.py"), "class GAN: pass\n").unwrap();
    fs::write(
        root.join("bgan/presets/refiner/proposed_round.py"),
        "NET_R = []\n",
    )
    .unwrap();
}

/// Settings that pin every derived value to what `resolved` already holds.
fn pinned(settings: &Settings, resolved: &ResolvedConfig) -> Settings {
    let dirs = &resolved.model.dirs;
    Settings {
        exp_name: Some(resolved.experiment.exp_name.clone()),
        first_stage_dir: Some(resolved.experiment.first_stage_dir.clone()),
        preset_g: None,
        preset_d: None,
        preset_r: None,
        overrides: Overrides {
            net_g: Some(resolved.model.net_g.clone()),
            net_d: Some(resolved.model.net_d.clone()),
            net_r: Some(resolved.model.net_r.clone()),
            checkpoint_dir: Some(dirs.checkpoint_dir.clone()),
            sample_dir: Some(dirs.sample_dir.clone()),
            eval_dir: Some(dirs.eval_dir.clone()),
            log_dir: Some(dirs.log_dir.clone()),
            src_dir: Some(dirs.src_dir.clone()),
        },
        ..settings.clone()
    }
}

#[test]
fn test_full_setup_produces_expected_layout() {
    let tmp = tempfile::tempdir().unwrap();
    make_project(tmp.path());

    let settings = Settings {
        two_stage_training: false,
        ..Settings::default()
    };
    let resolver = ConfigResolver::new(tmp.path());
    let resolved = resolver.resolve(&settings).unwrap();
    resolved.model.dirs.provision().unwrap();
    let report = snapshot_sources(
        resolver.project_root(),
        &resolved.model.dirs.src_dir,
        &settings.snapshot,
    )
    .unwrap();

    let exp = tmp
        .path()
        .join("exp/wgan-gp-bmnist_end2end_g_mlp_real_d_mlp");
    for role in DirRole::ALL {
        assert!(exp.join(role.subfolder()).is_dir(), "missing {role}");
    }
    assert_eq!(report.top_level_files, 2);
    assert_eq!(report.tree_files, 2);
    assert!(exp.join("src/config.py").is_file());
    assert!(exp.join("src/train.py").is_file());
    assert!(exp.join("src/bgan/models.py").is_file());
    assert!(exp.join("src/bgan/presets/refiner/proposed_round.py").is_file());
}

#[test]
fn test_setup_twice_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    make_project(tmp.path());
    let settings = Settings::default();
    let resolver = ConfigResolver::new(tmp.path());

    for _ in 0..2 {
        let resolved = resolver.resolve(&settings).unwrap();
        resolved.model.dirs.provision().unwrap();
        snapshot_sources(tmp.path(), &resolved.model.dirs.src_dir, &settings.snapshot).unwrap();
    }

    let experiments: Vec<_> = fs::read_dir(tmp.path().join("exp"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(
        experiments,
        vec!["wgan-gp-bmnist_pretrain_g_mlp_real_d_mlp".to_string()]
    );
    let src = tmp
        .path()
        .join("exp/wgan-gp-bmnist_pretrain_g_mlp_real_d_mlp/src");
    let mut entries: Vec<_> = fs::read_dir(src)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["bgan", "config.py", "train.py"]);
}

#[test]
fn test_unknown_preset_creates_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = Settings {
        training_phase: TrainingPhase::Train,
        preset_r: Some("proposed_sigmoid".into()),
        ..Settings::default()
    };

    let err = ConfigResolver::new(tmp.path())
        .resolve(&settings)
        .unwrap_err();

    match err {
        BganError::Config(ConfigError::UnknownPreset { role, name }) => {
            assert_eq!(role, NetworkRole::Refiner);
            assert_eq!(name, "proposed_sigmoid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!tmp.path().join("exp").exists());
}

#[test]
fn test_pinned_settings_resolve_to_the_same_records() {
    let resolver = ConfigResolver::new("/proj");
    for settings in [
        Settings::default(),
        Settings {
            two_stage_training: false,
            ..Settings::default()
        },
        Settings {
            training_phase: TrainingPhase::Train,
            joint_training: true,
            pretrained_dir: Some("/models/warm".into()),
            ..Settings::default()
        },
    ] {
        let resolved = resolver.resolve(&settings).unwrap();
        let again = resolver.resolve(&pinned(&settings, &resolved)).unwrap();
        assert_eq!(again, resolved);
    }
}

#[test]
fn test_train_phase_finds_pretrain_checkpoints() {
    let tmp = tempfile::tempdir().unwrap();
    let resolver = ConfigResolver::new(tmp.path());

    let pretrain = resolver.resolve(&Settings::default()).unwrap();
    pretrain.model.dirs.provision().unwrap();

    let train = resolver
        .resolve(&Settings {
            training_phase: TrainingPhase::Train,
            ..Settings::default()
        })
        .unwrap();

    assert_eq!(
        train.experiment.first_stage_dir,
        pretrain.model.dirs.checkpoint_dir
    );
    assert!(train.experiment.first_stage_dir.is_dir());
    assert_ne!(train.experiment.exp_name, pretrain.experiment.exp_name);
}

#[test]
fn test_resolved_config_serializes_for_downstream_tools() {
    let resolved = ConfigResolver::new("/proj")
        .resolve(&Settings::default())
        .unwrap();
    let json = serde_json::to_value(&resolved).unwrap();
    assert_eq!(
        json["experiment"]["exp_name"],
        "wgan-gp-bmnist_pretrain_g_mlp_real_d_mlp"
    );
    assert_eq!(json["data"]["training_data_location"], "sa");
    assert_eq!(json["model"]["gan"]["type"], "wgan-gp");
    assert_eq!(json["train"]["training_phase"], "pretrain");
    assert_eq!(json["model"]["sample_grid"], serde_json::json!([4, 8]));
    assert_eq!(json["model"]["net_r"]["layers"][4]["type"], "binary_neuron");
}

#[test]
fn test_snapshot_into_project_root_keeps_sources_intact() {
    let tmp = tempfile::tempdir().unwrap();
    make_project(tmp.path());

    let settings = Settings {
        overrides: Overrides {
            src_dir: Some(tmp.path().to_path_buf()),
            ..Overrides::default()
        },
        ..Settings::default()
    };
    let resolver = ConfigResolver::new(tmp.path());
    let resolved = resolver.resolve(&settings).unwrap();
    resolved.model.dirs.provision().unwrap();

    let err = snapshot_sources(
        resolver.project_root(),
        &resolved.model.dirs.src_dir,
        &settings.snapshot,
    )
    .unwrap_err();

    assert!(matches!(err, BganError::Io { .. }));
    assert_eq!(
        fs::read_to_string(tmp.path().join("config.py")).unwrap(),
        "SETUP = {}\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("bgan/models.py")).unwrap(),
        "class GAN: pass\n"
    );
}

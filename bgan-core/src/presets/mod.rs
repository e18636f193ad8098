//! Named architecture presets, registered per network role.
//!
//! Each role owns its own table, so the same preset name may mean different
//! things for a generator and a discriminator.

mod discriminator;
mod generator;
mod refiner;
pub mod spec;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
pub use spec::{Activation, BinaryEstimator, LayerSpec, NetworkSpec, Padding};

/// The three networks an experiment is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkRole {
    Generator,
    Discriminator,
    Refiner,
}

impl NetworkRole {
    pub const ALL: [NetworkRole; 3] = [Self::Generator, Self::Discriminator, Self::Refiner];

    /// Settings field that selects a preset for this role.
    pub fn preset_field(self) -> &'static str {
        match self {
            Self::Generator => "preset_g",
            Self::Discriminator => "preset_d",
            Self::Refiner => "preset_r",
        }
    }

    /// Override field that carries an explicit spec for this role.
    pub fn spec_field(self) -> &'static str {
        match self {
            Self::Generator => "net_g",
            Self::Discriminator => "net_d",
            Self::Refiner => "net_r",
        }
    }
}

impl fmt::Display for NetworkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generator => write!(f, "generator"),
            Self::Discriminator => write!(f, "discriminator"),
            Self::Refiner => write!(f, "refiner"),
        }
    }
}

impl FromStr for NetworkRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generator" | "g" => Ok(Self::Generator),
            "discriminator" | "d" => Ok(Self::Discriminator),
            "refiner" | "r" => Ok(Self::Refiner),
            other => Err(format!("unknown network role: '{other}'")),
        }
    }
}

/// A registry entry: preset name plus the factory that builds its spec.
pub struct Preset {
    pub name: &'static str,
    build: fn() -> NetworkSpec,
}

impl Preset {
    pub fn build(&self) -> NetworkSpec {
        (self.build)()
    }
}

static GENERATOR_PRESETS: &[Preset] = &[
    Preset {
        name: "mlp",
        build: generator::mlp,
    },
    Preset {
        name: "mlp_real",
        build: generator::mlp_real,
    },
    Preset {
        name: "proposed",
        build: generator::proposed,
    },
    Preset {
        name: "proposed_small",
        build: generator::proposed_small,
    },
];

static DISCRIMINATOR_PRESETS: &[Preset] = &[
    Preset {
        name: "mlp",
        build: discriminator::mlp,
    },
    Preset {
        name: "proposed",
        build: discriminator::proposed,
    },
    Preset {
        name: "proposed_small",
        build: discriminator::proposed_small,
    },
    Preset {
        name: "ablated",
        build: discriminator::ablated,
    },
    Preset {
        name: "baseline",
        build: discriminator::baseline,
    },
];

static REFINER_PRESETS: &[Preset] = &[
    Preset {
        name: "proposed_round",
        build: refiner::proposed_round,
    },
    Preset {
        name: "proposed_bernoulli",
        build: refiner::proposed_bernoulli,
    },
];

/// All presets registered for `role`.
pub fn registry(role: NetworkRole) -> &'static [Preset] {
    match role {
        NetworkRole::Generator => GENERATOR_PRESETS,
        NetworkRole::Discriminator => DISCRIMINATOR_PRESETS,
        NetworkRole::Refiner => REFINER_PRESETS,
    }
}

/// Registered preset names for `role`, in registration order.
pub fn names(role: NetworkRole) -> Vec<&'static str> {
    registry(role).iter().map(|p| p.name).collect()
}

/// Build the spec registered under `name` for `role`.
pub fn lookup(role: NetworkRole, name: &str) -> Result<NetworkSpec, ConfigError> {
    registry(role)
        .iter()
        .find(|p| p.name == name)
        .map(Preset::build)
        .ok_or_else(|| ConfigError::UnknownPreset {
            role,
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_registered_preset_builds() {
        for role in NetworkRole::ALL {
            for preset in registry(role) {
                let spec = preset.build();
                assert!(!spec.is_empty(), "{role}/{} has no layers", preset.name);
            }
        }
    }

    #[test]
    fn test_names_are_unique_per_role() {
        for role in NetworkRole::ALL {
            let all = names(role);
            let unique: HashSet<_> = all.iter().collect();
            assert_eq!(all.len(), unique.len(), "duplicate preset in {role}");
        }
    }

    #[test]
    fn test_same_name_resolves_per_role() {
        let g = lookup(NetworkRole::Generator, "mlp").unwrap();
        let d = lookup(NetworkRole::Discriminator, "mlp").unwrap();
        assert_ne!(g, d);
        assert!(g.has_binary_output());
        assert!(!d.has_binary_output());
    }

    #[test]
    fn test_unknown_preset_names_role() {
        let err = lookup(NetworkRole::Refiner, "mlp").unwrap_err();
        match err {
            ConfigError::UnknownPreset { role, name } => {
                assert_eq!(role, NetworkRole::Refiner);
                assert_eq!(name, "mlp");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_refiners_differ_only_in_estimator() {
        let round = lookup(NetworkRole::Refiner, "proposed_round").unwrap();
        let bernoulli = lookup(NetworkRole::Refiner, "proposed_bernoulli").unwrap();
        assert_eq!(round.len(), bernoulli.len());
        assert_eq!(
            round.layers[..round.len() - 1],
            bernoulli.layers[..bernoulli.len() - 1]
        );
        assert_eq!(
            bernoulli.layers.last(),
            Some(&LayerSpec::binary_neuron(BinaryEstimator::Bernoulli))
        );
    }

    #[test]
    fn test_role_parsing_and_fields() {
        assert_eq!("D".parse::<NetworkRole>().unwrap(), NetworkRole::Discriminator);
        assert_eq!(
            "refiner".parse::<NetworkRole>().unwrap(),
            NetworkRole::Refiner
        );
        assert!("critic".parse::<NetworkRole>().is_err());
        assert_eq!(NetworkRole::Generator.preset_field(), "preset_g");
        assert_eq!(NetworkRole::Refiner.spec_field(), "net_r");
    }
}

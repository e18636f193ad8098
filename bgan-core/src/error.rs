//! Error types for the bgan core library.
//!
//! Uses `thiserror` for public API error types. Configuration problems and
//! filesystem failures are kept apart so callers can tell "fix your settings"
//! from "fix your disk".

use std::path::PathBuf;

use crate::presets::NetworkRole;

/// Top-level error type for the bgan core library.
#[derive(Debug, thiserror::Error)]
pub enum BganError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BganError {
    /// Wrap an I/O error together with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while turning settings into resolved records.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown {role} preset: '{name}'")]
    UnknownPreset { role: NetworkRole, name: String },

    #[error(
        "No {role} architecture: set `{}` or `overrides.{}`",
        .role.preset_field(),
        .role.spec_field()
    )]
    MissingArchitecture { role: NetworkRole },

    #[error(
        "Both `{}` and `overrides.{}` were given for the {role}",
        .role.preset_field(),
        .role.spec_field()
    )]
    ConflictingArchitecture { role: NetworkRole },

    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

/// A type alias for results using the top-level `BganError`.
pub type Result<T> = std::result::Result<T, BganError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_preset() {
        let err = BganError::Config(ConfigError::UnknownPreset {
            role: NetworkRole::Discriminator,
            name: "resnet".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown discriminator preset: 'resnet'"
        );
    }

    #[test]
    fn test_error_display_missing_architecture() {
        let err = ConfigError::MissingArchitecture {
            role: NetworkRole::Refiner,
        };
        assert_eq!(
            err.to_string(),
            "No refiner architecture: set `preset_r` or `overrides.net_r`"
        );
    }

    #[test]
    fn test_error_display_conflicting_architecture_names_fields() {
        let err = ConfigError::ConflictingArchitecture {
            role: NetworkRole::Generator,
        };
        assert_eq!(
            err.to_string(),
            "Both `preset_g` and `overrides.net_g` were given for the generator"
        );
    }

    #[test]
    fn test_error_display_missing_field() {
        let err = BganError::Config(ConfigError::MissingField {
            field: "preset_g".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field: preset_g"
        );
    }

    #[test]
    fn test_error_io_includes_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BganError::io("/exp/run/checkpoints", io_err);
        assert_eq!(err.to_string(), "IO error at /exp/run/checkpoints: denied");
        assert!(matches!(err, BganError::Io { .. }));
    }

    #[test]
    fn test_error_from_config() {
        let err: BganError = ConfigError::ConflictingArchitecture {
            role: NetworkRole::Generator,
        }
        .into();
        assert!(matches!(err, BganError::Config(_)));
    }
}

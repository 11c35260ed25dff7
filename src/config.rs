use crate::physics::integrators::IntegratorKind;
use crate::physics::math::Scalar;
use crate::physics::resources::PhysicsTime;
use crate::physics::world_limit::{DEFAULT_WORLD_LIMIT, WorldLimit, WorldLimitError};
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment variables read by [`SimulationConfig::load_layered`],
/// e.g. `PLANEWORLD_PHYSICS__TIME_STEP=0.01`.
pub const ENV_PREFIX: &str = "PLANEWORLD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to assemble configuration: {0}")]
    Layered(#[from] ::config::ConfigError),
    #[error(transparent)]
    WorldLimit(#[from] WorldLimitError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub world: WorldConfig,
    pub integrators: IntegratorsConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub time_step: Scalar,
    pub time_factor: Scalar,
    pub start_paused: bool,
    /// Fixed steps run by the headless driver
    pub steps: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            time_factor: 1.0,
            start_paused: false,
            steps: 600,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub limit_x: Scalar,
    pub limit_y: Scalar,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            limit_x: DEFAULT_WORLD_LIMIT,
            limit_y: DEFAULT_WORLD_LIMIT,
        }
    }
}

/// Integration method per degree of freedom
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct IntegratorsConfig {
    pub position: IntegratorKind,
    pub velocity: IntegratorKind,
    pub angle: IntegratorKind,
    pub angle_velocity: IntegratorKind,
}

impl Default for IntegratorsConfig {
    /// Adams–Bashforth predicts velocities, Adams–Moulton corrects positions.
    fn default() -> Self {
        Self {
            position: IntegratorKind::AdamsMoulton,
            velocity: IntegratorKind::AdamsBashforth,
            angle: IntegratorKind::AdamsMoulton,
            angle_velocity: IntegratorKind::AdamsBashforth,
        }
    }
}

impl IntegratorsConfig {
    /// Same method for every degree of freedom
    pub fn uniform(kind: IntegratorKind) -> Self {
        Self {
            position: kind,
            velocity: kind,
            angle: kind,
            angle_velocity: kind,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Failed to parse config file {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    /// Defaults, then the optional TOML file, then `PLANEWORLD_*` environment
    /// variables. The result is validated.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_layered_with_env(path, None)
    }

    /// Like [`SimulationConfig::load_layered`], reading `PLANEWORLD_*`
    /// variables from `env` instead of the process environment when given.
    pub fn load_layered_with_env(
        path: Option<&Path>,
        env: Option<::config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);
        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }
        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `config.toml` in the platform configuration directory
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "planeworld").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn load_from_user_config() -> Self {
        match Self::user_config_path() {
            Some(path) => Self::load_or_default(path),
            None => {
                warn!("No configuration directory available. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        if !(physics.time_step.is_finite() && physics.time_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.time_step must be positive, got {}",
                physics.time_step
            )));
        }
        if !(physics.time_factor.is_finite() && physics.time_factor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.time_factor must be positive, got {}",
                physics.time_factor
            )));
        }
        self.world_limit()?;
        Ok(())
    }

    pub fn world_limit(&self) -> Result<WorldLimit, WorldLimitError> {
        WorldLimit::new(self.world.limit_x, self.world.limit_y)
    }

    pub fn physics_time(&self) -> PhysicsTime {
        PhysicsTime::new(
            self.physics.time_step,
            self.physics.time_factor,
            self.physics.start_paused,
        )
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

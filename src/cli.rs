//! Command line interface for Planeworld

use clap::Parser;
use std::fmt;
use std::path::PathBuf;

use crate::config::{IntegratorsConfig, SimulationConfig};
use crate::physics::integrators::IntegratorRegistry;
use crate::physics::math::Scalar;

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Invalid integrator name provided
    InvalidIntegrator(String),
    /// Overrides produced an unusable configuration
    InvalidOverride(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidIntegrator(msg) => write!(f, "Invalid integrator: {msg}"),
            CliError::InvalidOverride(msg) => write!(f, "Invalid override: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Planeworld - 2D bodies in chained reference frames
#[derive(Parser, Debug)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_DATE"), ")"), about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Integrator for every degree of freedom (e.g., euler, ab4, am5)
    #[arg(short = 'i', long, value_name = "TYPE")]
    pub integrator: Option<String>,

    /// Number of fixed steps to simulate (overrides config file)
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub steps: Option<u64>,

    /// Fixed timestep in seconds (overrides config file)
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub time_step: Option<Scalar>,

    /// Half-extent of the wrapping world on both axes
    #[arg(long, value_name = "METERS")]
    pub world_limit: Option<Scalar>,

    /// Start paused
    #[arg(short = 'p', long)]
    pub paused: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// List available integrators and exit
    #[arg(long)]
    pub list_integrators: bool,
}

/// Handles the --list-integrators flag by printing available integrators and exiting
pub fn handle_list_integrators() {
    let registry = IntegratorRegistry::new().with_standard_integrators();
    println!("Available integrators:");
    for name in registry.list_available() {
        println!("  - {name}");
    }

    let aliases = registry.list_aliases();
    if !aliases.is_empty() {
        println!("\nAliases:");
        for (alias, target) in aliases {
            println!("  - {alias} -> {target}");
        }
    }
}

/// Loads configuration from file, environment or defaults, then applies
/// command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    load_and_apply_config_with_env(args, None)
}

/// Like [`load_and_apply_config`], with `PLANEWORLD_*` variables taken from
/// `env` instead of the process environment when given
pub fn load_and_apply_config_with_env(
    args: &Args,
    env: Option<::config::Map<String, String>>,
) -> Result<SimulationConfig, CliError> {
    let mut config = match &args.config {
        Some(config_path) => {
            println!("Loading configuration from: {}", config_path.display());
            SimulationConfig::load_layered_with_env(Some(config_path.as_path()), env)
                .map_err(|err| CliError::ConfigLoad(err.to_string()))?
        }
        None => SimulationConfig::load_from_user_config(),
    };

    if let Some(integrator_type) = &args.integrator {
        // Validate integrator name against registry
        let registry = IntegratorRegistry::new().with_standard_integrators();
        let kind = registry
            .resolve(integrator_type)
            .map_err(|err| CliError::InvalidIntegrator(err.to_string()))?;

        println!("Using integrator: {kind}");
        config.integrators = IntegratorsConfig::uniform(kind);
    }

    if let Some(steps) = args.steps {
        println!("Overriding step count to: {steps}");
        config.physics.steps = steps;
    }

    if let Some(time_step) = args.time_step {
        println!("Overriding time step to: {time_step}");
        config.physics.time_step = time_step;
    }

    if let Some(limit) = args.world_limit {
        println!("Overriding world limit to: {limit}");
        config.world.limit_x = limit;
        config.world.limit_y = limit;
    }

    if args.paused {
        config.physics.start_paused = true;
    }

    config
        .validate()
        .map_err(|err| CliError::InvalidOverride(err.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::integrators::IntegratorKind;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["planeworld", "--config", "/nonexistent/planeworld.toml"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    /// Apply `args` with an empty environment, independent of the host.
    fn load(args: &Args) -> Result<SimulationConfig, CliError> {
        load_and_apply_config_with_env(args, Some(Default::default()))
    }

    #[test]
    fn test_integrator_alias_applies_to_all_degrees_of_freedom() {
        let config = load(&args(&["--integrator", "ab4"])).unwrap();
        assert_eq!(
            config.integrators,
            IntegratorsConfig::uniform(IntegratorKind::AdamsBashforth)
        );
    }

    #[test]
    fn test_unknown_integrator_rejected() {
        let result = load(&args(&["-i", "leapfrog"]));
        assert!(matches!(result, Err(CliError::InvalidIntegrator(_))));
    }

    #[test]
    fn test_numeric_overrides() {
        let config = load(&args(&[
            "--steps",
            "10",
            "--time-step",
            "0.5",
            "--world-limit",
            "1000",
            "--paused",
        ]))
        .unwrap();

        assert_eq!(config.physics.steps, 10);
        assert_eq!(config.physics.time_step, 0.5);
        assert_eq!(config.world.limit_x, 1000.0);
        assert_eq!(config.world.limit_y, 1000.0);
        assert!(config.physics.start_paused);
    }

    #[test]
    fn test_flags_override_environment() {
        let env = ::config::Map::from([
            ("PLANEWORLD_PHYSICS__STEPS".to_string(), "5".to_string()),
            ("PLANEWORLD_PHYSICS__TIME_FACTOR".to_string(), "3".to_string()),
        ]);
        let config = load_and_apply_config_with_env(&args(&["-n", "12"]), Some(env)).unwrap();

        assert_eq!(config.physics.steps, 12);
        assert_eq!(config.physics.time_factor, 3.0);
    }

    #[test]
    fn test_invalid_environment_rejected() {
        let env = ::config::Map::from([(
            "PLANEWORLD_PHYSICS__TIME_STEP".to_string(),
            "-2".to_string(),
        )]);
        let result = load_and_apply_config_with_env(&args(&[]), Some(env));
        assert!(matches!(result, Err(CliError::ConfigLoad(_))));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = load(&args(&["--time-step=-1"]));
        assert!(matches!(result, Err(CliError::InvalidOverride(_))));
    }
}

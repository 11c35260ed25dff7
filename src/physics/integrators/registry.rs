//! Name lookup for integration methods
//!
//! Each [`IntegratorKind`] describes itself: canonical name, aliases and
//! convergence order. The registry reads that metadata to build a lookup
//! table, so the CLI and configuration can refer to methods by any of their
//! names. Only the kind is stored; integrators are built fresh on request
//! because they carry per-quantity state.

use super::{AnyIntegrator, Integrable, IntegratorError, IntegratorKind};
use bevy::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Resource, Debug, Clone)]
pub struct IntegratorRegistry {
    /// Maps canonical names and aliases to kinds
    kinds: HashMap<String, IntegratorKind>,
}

impl IntegratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Register every built-in method. Returns self for chaining.
    pub fn with_standard_integrators(mut self) -> Self {
        for kind in IntegratorKind::ALL {
            self.register_integrator(kind);
        }
        self
    }

    pub fn with_integrator(mut self, kind: IntegratorKind) -> Self {
        self.register_integrator(kind);
        self
    }

    pub fn register_integrator(&mut self, kind: IntegratorKind) {
        self.kinds.insert(kind.name().to_string(), kind);
        for alias in kind.aliases() {
            self.kinds.insert((*alias).to_string(), kind);
        }
    }

    /// Resolve a name or alias to its kind.
    pub fn resolve(&self, name: &str) -> Result<IntegratorKind, IntegratorError> {
        self.kinds
            .get(name)
            .copied()
            .ok_or_else(|| IntegratorError::UnknownIntegrator {
                name: name.to_string(),
                available: self.list_available().join(", "),
            })
    }

    /// Build an uninitialized integrator by name.
    pub fn create<T: Integrable>(&self, name: &str) -> Result<AnyIntegrator<T>, IntegratorError> {
        self.resolve(name).map(AnyIntegrator::new)
    }

    /// Sorted canonical names
    pub fn list_available(&self) -> Vec<String> {
        let canonical: BTreeSet<&'static str> = self.kinds.values().map(|kind| kind.name()).collect();
        canonical.into_iter().map(str::to_string).collect()
    }

    /// `(alias, canonical)` pairs sorted by alias
    pub fn list_aliases(&self) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .kinds
            .iter()
            .filter(|(key, kind)| key.as_str() != kind.name())
            .map(|(key, kind)| (key.clone(), kind.name().to_string()))
            .collect();
        aliases.sort();
        aliases
    }
}

impl Default for IntegratorRegistry {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::integrators::Integrator;
    use crate::physics::math::{Scalar, Vector};

    #[test]
    fn test_registry_discovery() {
        let registry = IntegratorRegistry::default();
        assert_eq!(
            registry.list_available(),
            vec!["adams_bashforth", "adams_moulton", "euler"]
        );
    }

    #[test]
    fn test_alias_resolution() {
        let registry = IntegratorRegistry::default();

        for (alias, canonical) in registry.list_aliases() {
            let via_alias = registry.create::<Scalar>(&alias).unwrap();
            let via_canonical = registry.create::<Scalar>(&canonical).unwrap();
            assert_eq!(via_alias.name(), via_canonical.name());
            assert_eq!(
                via_alias.convergence_order(),
                via_canonical.convergence_order(),
                "Convergence order mismatch for alias '{alias}'"
            );
        }
    }

    #[test]
    fn test_list_aliases() {
        let registry = IntegratorRegistry::default();
        let alias_map: HashMap<_, _> = registry.list_aliases().into_iter().collect();

        assert_eq!(alias_map.get("ab4"), Some(&"adams_bashforth".to_string()));
        assert_eq!(alias_map.get("am"), Some(&"adams_moulton".to_string()));
        assert_eq!(alias_map.get("forward_euler"), Some(&"euler".to_string()));
        assert_eq!(alias_map.len(), 7);
    }

    #[test]
    fn test_unknown_integrator_error() {
        let registry = IntegratorRegistry::default();
        let error = registry.create::<Vector>("runge_kutta").unwrap_err();
        let message = error.to_string();

        assert!(message.contains("Unknown integrator"));
        assert!(message.contains("runge_kutta"));
        assert!(message.contains("adams_bashforth, adams_moulton, euler"));
    }

    #[test]
    fn test_created_integrators_are_independent() {
        let registry = IntegratorRegistry::default();
        let mut first = registry.create::<Scalar>("am5").unwrap();
        let mut second = registry.create::<Scalar>("am5").unwrap();
        first.init(1.0);
        second.init(1.0);

        first.integrate(10.0, 1.0).unwrap();
        assert_eq!(second.value(), 1.0);
        assert!(!registry.create::<Scalar>("am5").unwrap().is_initialized());
    }

    #[test]
    fn test_empty_registry() {
        let registry = IntegratorRegistry::new();
        assert!(registry.list_available().is_empty());
        assert!(registry.list_aliases().is_empty());
        assert!(registry.create::<Scalar>("euler").is_err());
    }

    #[test]
    fn test_case_sensitivity() {
        let registry = IntegratorRegistry::default();
        assert!(registry.resolve("Euler").is_err());
        assert!(registry.resolve("AB4").is_err());
        assert_eq!(registry.resolve("ab4"), Ok(IntegratorKind::AdamsBashforth));
    }

    #[test]
    fn test_builder_and_duplicate_registration() {
        let registry = IntegratorRegistry::new()
            .with_integrator(IntegratorKind::Euler)
            .with_integrator(IntegratorKind::Euler);
        assert_eq!(registry.list_available(), vec!["euler"]);
        assert_eq!(
            registry.list_aliases(),
            vec![("forward_euler".to_string(), "euler".to_string())]
        );
    }

    #[test]
    fn test_register_integrator_mutability() {
        let mut registry = IntegratorRegistry::new();
        registry.register_integrator(IntegratorKind::AdamsBashforth);
        registry.register_integrator(IntegratorKind::AdamsMoulton);

        assert_eq!(registry.list_available().len(), 2);
        assert!(registry.resolve("bashforth").is_ok());
        assert!(registry.resolve("euler").is_err());
    }
}

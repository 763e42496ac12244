// Class registry: run-time type identity -> exposed class name.
//
// Every polymorphic class registers itself once per interface module that
// mentions it, so the same identity may arrive more than once.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Submitted by [`register_class!`](crate::register_class) at link time.
pub struct ClassRegistryEntry {
    pub type_id: fn() -> TypeId,
    pub name: &'static str,
}
inventory::collect!(ClassRegistryEntry);

/// `TypeId::of` as a plain function, usable in static registrations.
pub fn type_id_of<T: 'static>() -> TypeId {
    TypeId::of::<T>()
}

/// Register `$ty` under the exposed class name `$name` at link time.
#[macro_export]
macro_rules! register_class {
    ($ty:ty, $name:expr) => {
        $crate::inventory::submit! {
            $crate::class_registry::ClassRegistryEntry {
                type_id: $crate::class_registry::type_id_of::<$ty>,
                name: $name,
            }
        }
    };
}

#[derive(Debug, Default)]
pub struct ClassRegistry {
    names: RwLock<HashMap<TypeId, &'static str>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every [`ClassRegistryEntry`] linked into the binary.
    pub fn from_inventory() -> Self {
        let registry = Self::new();
        let mut count = 0usize;
        for entry in inventory::iter::<ClassRegistryEntry> {
            registry.register((entry.type_id)(), entry.name);
            count += 1;
        }
        tracing::debug!(entries = count, classes = registry.len(), "class registry loaded");
        registry
    }

    /// Associate a type with its exposed name. Registering an identity again is
    /// tolerated; the last name wins.
    pub fn register(&self, type_id: TypeId, name: &'static str) {
        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = names.insert(type_id, name) {
            if previous != name {
                tracing::warn!(previous, name, "class identity re-registered under a new name");
            }
        }
    }

    pub fn class_name(&self, type_id: TypeId) -> Option<&'static str> {
        let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
        names.get(&type_id).copied()
    }

    /// Registered name, or `declared` for identities that were never registered.
    pub fn class_name_or(&self, type_id: TypeId, declared: &'static str) -> &'static str {
        self.class_name(type_id).unwrap_or(declared)
    }

    pub fn len(&self) -> usize {
        self.names.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide registry, filled from link-time registrations on first use.
pub fn global() -> &'static ClassRegistry {
    static GLOBAL: OnceLock<ClassRegistry> = OnceLock::new();
    GLOBAL.get_or_init(ClassRegistry::from_inventory)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;
    struct Point;
    struct Unregistered;

    crate::register_class!(Marker, "Marker");
    crate::register_class!(Marker, "Marker");
    crate::register_class!(Point, "Point");

    #[test]
    fn inventory_entries_are_collected() {
        let registry = ClassRegistry::from_inventory();
        assert_eq!(registry.class_name(TypeId::of::<Marker>()), Some("Marker"));
        assert_eq!(registry.class_name(TypeId::of::<Point>()), Some("Point"));
        assert_eq!(global().class_name(TypeId::of::<Point>()), Some("Point"));
    }

    #[test]
    fn duplicate_registration_is_tolerated() {
        let registry = ClassRegistry::new();
        registry.register(TypeId::of::<Marker>(), "Marker");
        registry.register(TypeId::of::<Marker>(), "Marker");
        assert_eq!(registry.len(), 1);
        registry.register(TypeId::of::<Marker>(), "BalloonPopup");
        assert_eq!(registry.class_name(TypeId::of::<Marker>()), Some("BalloonPopup"));
    }

    #[test]
    fn unregistered_type_falls_back_to_declared_name() {
        let registry = ClassRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.class_name_or(TypeId::of::<Unregistered>(), "Layer"), "Layer");
    }
}

// Factory table: exposed class name -> proxy constructor.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::dispatch::ProxyRef;
use crate::error::RuntimeResult;
use crate::handle::NativeHandle;

/// Builds the proxy of a native object: `(handle, owns_memory)`.
pub type ProxyFactory = fn(NativeHandle, bool) -> RuntimeResult<ProxyRef>;

/// Submitted by [`register_factory!`](crate::register_factory) when a proxy module is linked.
pub struct FactoryRegistration {
    pub class_name: &'static str,
    pub factory: ProxyFactory,
}
inventory::collect!(FactoryRegistration);

/// Register `$factory` as the constructor of the exposed class `$name`.
#[macro_export]
macro_rules! register_factory {
    ($name:expr, $factory:path) => {
        $crate::inventory::submit! {
            $crate::factory::FactoryRegistration {
                class_name: $name,
                factory: $factory,
            }
        }
    };
}

#[derive(Default)]
pub struct FactoryTable {
    factories: RwLock<HashMap<String, ProxyFactory>>,
}

impl FactoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_inventory() -> Self {
        let table = Self::new();
        for registration in inventory::iter::<FactoryRegistration> {
            table.register(registration.class_name, registration.factory);
        }
        tracing::debug!(factories = table.len(), "factory table loaded");
        table
    }

    pub fn register(&self, class_name: &str, factory: ProxyFactory) {
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class_name.to_string(), factory);
    }

    pub fn get(&self, class_name: &str) -> Option<ProxyFactory> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.get(class_name).copied()
    }

    pub fn len(&self) -> usize {
        self.factories.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide table, filled from link-time registrations on first use.
pub fn global() -> &'static FactoryTable {
    static GLOBAL: OnceLock<FactoryTable> = OnceLock::new();
    GLOBAL.get_or_init(FactoryTable::from_inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::TestProxy;

    fn make_polygon(handle: NativeHandle, owns: bool) -> RuntimeResult<ProxyRef> {
        Ok(TestProxy::owned("Polygon", handle, owns))
    }

    crate::register_factory!("Polygon", make_polygon);

    #[test]
    fn registered_factories_are_found() {
        let table = FactoryTable::from_inventory();
        let factory = table.get("Polygon").unwrap();
        let proxy = factory(NativeHandle::from_raw(8), true).unwrap();
        assert_eq!(proxy.handle(), NativeHandle::from_raw(8));
        assert!(proxy.owns_memory());
        assert!(global().get("Polygon").is_some());
    }

    #[test]
    fn explicit_registration_overrides() {
        let table = FactoryTable::new();
        assert!(table.get("Line").is_none());
        table.register("Line", make_polygon);
        assert_eq!(table.len(), 1);
        assert!(table.get("Line").is_some());
    }
}

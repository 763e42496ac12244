// Polymorphic dispatch: turns a native handle into the right target-language proxy.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::class_registry::{self, ClassRegistry};
use crate::director::DirectorTable;
use crate::error::RuntimeError;
use crate::factory::{self, FactoryTable};
use crate::handle::NativeHandle;

/// A target-language proxy of a native object.
pub trait Proxy: Any + Send + Sync {
    fn handle(&self) -> NativeHandle;

    /// Whether dropping the proxy releases the native object.
    fn owns_memory(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

pub type ProxyRef = Arc<dyn Proxy>;

/// Native-side queries the generated accessors answer.
pub trait NativeObjects {
    /// Dynamic type of the object behind `handle`, if the native side knows it.
    fn dynamic_type(&self, handle: NativeHandle) -> Option<TypeId>;
}

/// The three tables generated code consults.
#[derive(Default)]
pub struct ProxyRuntime {
    pub classes: ClassRegistry,
    pub directors: DirectorTable,
    pub factories: FactoryTable,
}

impl ProxyRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables filled from link-time registrations.
    pub fn from_inventory() -> Self {
        ProxyRuntime {
            classes: ClassRegistry::from_inventory(),
            directors: DirectorTable::new(),
            factories: FactoryTable::from_inventory(),
        }
    }
}

/// Dispatch for one declared polymorphic base class.
pub struct PolymorphicDispatcher<'a> {
    classes: &'a ClassRegistry,
    directors: &'a DirectorTable,
    factories: &'a FactoryTable,
    natives: &'a dyn NativeObjects,
    declared_name: &'static str,
}

impl<'a> PolymorphicDispatcher<'a> {
    pub fn new(
        runtime: &'a ProxyRuntime,
        natives: &'a dyn NativeObjects,
        declared_name: &'static str,
    ) -> Self {
        PolymorphicDispatcher {
            classes: &runtime.classes,
            directors: &runtime.directors,
            factories: &runtime.factories,
            natives,
            declared_name,
        }
    }

    /// Dispatcher over the process-wide class and factory tables.
    pub fn global(
        directors: &'a DirectorTable,
        natives: &'a dyn NativeObjects,
        declared_name: &'static str,
    ) -> Self {
        PolymorphicDispatcher {
            classes: class_registry::global(),
            directors,
            factories: factory::global(),
            natives,
            declared_name,
        }
    }

    /// Exposed name of the most derived registered class, else the declared name.
    pub fn class_name(&self, handle: NativeHandle) -> &'static str {
        self.natives
            .dynamic_type(handle)
            .map(|type_id| self.classes.class_name_or(type_id, self.declared_name))
            .unwrap_or(self.declared_name)
    }

    /// Null gives `None`. A bound director is returned as is. Otherwise the factory
    /// of the object's class builds a new proxy; failures are logged and give `None`.
    pub fn create_instance(&self, handle: NativeHandle, owns_memory: bool) -> Option<ProxyRef> {
        if handle.is_null() {
            return None;
        }
        if let Some(director) = self.directors.object_for(handle) {
            return Some(director);
        }

        let class_name = self.class_name(handle);
        let result = match self.factories.get(class_name) {
            Some(factory) => factory(handle, owns_memory),
            None => Err(RuntimeError::UnknownClass(class_name.to_string())),
        };
        match result {
            Ok(proxy) => Some(proxy),
            Err(err) => {
                tracing::error!(class = class_name, %handle, "could not instantiate class: {err}");
                None
            }
        }
    }
}

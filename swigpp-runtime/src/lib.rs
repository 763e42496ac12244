// swigpp-runtime: reference model of the runtime contract behind polymorphic proxies.
// Generated proxy code relies on three tables (class names, directors, factories)
// and one dispatch routine; this crate models them so the contract can be tested.

pub mod error;
pub mod handle;
pub mod class_registry;
pub mod director;
pub mod factory;
pub mod dispatch;

pub use error::{RuntimeError, RuntimeResult};
pub use handle::NativeHandle;
pub use class_registry::{ClassRegistry, ClassRegistryEntry};
pub use director::DirectorTable;
pub use factory::{FactoryRegistration, FactoryTable, ProxyFactory};
pub use dispatch::{NativeObjects, PolymorphicDispatcher, Proxy, ProxyRef, ProxyRuntime};

// Used by the registration macros.
#[doc(hidden)]
pub use inventory;

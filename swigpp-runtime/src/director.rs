// Director table: native handle <-> bound target-language object.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::dispatch::ProxyRef;
use crate::error::{RuntimeError, RuntimeResult};
use crate::handle::NativeHandle;

#[derive(Default)]
struct Bindings {
    by_handle: HashMap<NativeHandle, ProxyRef>,
    by_object: HashMap<usize, NativeHandle>,
}

/// Populated when a target-language subclass binds to a native director, so the
/// same object is returned whenever the native side hands the handle back.
#[derive(Default)]
pub struct DirectorTable {
    bindings: RwLock<Bindings>,
}

fn object_key(object: &ProxyRef) -> usize {
    Arc::as_ptr(object) as *const () as usize
}

impl DirectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `object` as the director of `handle`. Rebinding the same pair is a no-op.
    pub fn bind(&self, handle: NativeHandle, object: ProxyRef) -> RuntimeResult<()> {
        if handle.is_null() {
            return Err(RuntimeError::NullHandle);
        }
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = bindings.by_handle.get(&handle) {
            if object_key(existing) == object_key(&object) {
                return Ok(());
            }
            return Err(RuntimeError::AlreadyBound(handle));
        }
        bindings.by_object.insert(object_key(&object), handle);
        bindings.by_handle.insert(handle, object);
        tracing::debug!(%handle, "director bound");
        Ok(())
    }

    /// Drop the binding of `handle` (the native director was destroyed).
    pub fn unbind(&self, handle: NativeHandle) -> Option<ProxyRef> {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        let object = bindings.by_handle.remove(&handle)?;
        bindings.by_object.remove(&object_key(&object));
        Some(object)
    }

    pub fn object_for(&self, handle: NativeHandle) -> Option<ProxyRef> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        bindings.by_handle.get(&handle).cloned()
    }

    pub fn handle_for(&self, object: &ProxyRef) -> Option<NativeHandle> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        bindings.by_object.get(&object_key(object)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner).by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::TestProxy;

    fn handle(raw: usize) -> NativeHandle {
        NativeHandle::from_raw(raw)
    }

    #[test]
    fn lookup_works_both_ways() {
        let table = DirectorTable::new();
        let object = TestProxy::shared("Listener", handle(0x100));
        table.bind(handle(0x100), object.clone()).unwrap();

        let found = table.object_for(handle(0x100)).unwrap();
        assert!(Arc::ptr_eq(&found, &object));
        assert_eq!(table.handle_for(&object), Some(handle(0x100)));
        assert!(table.object_for(handle(0x200)).is_none());
    }

    #[test]
    fn rebinding_is_checked() {
        let table = DirectorTable::new();
        let first = TestProxy::shared("Listener", handle(0x100));
        let second = TestProxy::shared("Listener", handle(0x100));
        table.bind(handle(0x100), first.clone()).unwrap();
        table.bind(handle(0x100), first.clone()).unwrap();
        assert_eq!(
            table.bind(handle(0x100), second),
            Err(RuntimeError::AlreadyBound(handle(0x100)))
        );
        assert_eq!(table.bind(NativeHandle::NULL, first), Err(RuntimeError::NullHandle));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unbind_clears_both_directions() {
        let table = DirectorTable::new();
        let object = TestProxy::shared("Listener", handle(0x100));
        table.bind(handle(0x100), object.clone()).unwrap();
        assert!(table.unbind(handle(0x100)).is_some());
        assert!(table.handle_for(&object).is_none());
        assert!(table.is_empty());
        assert!(table.unbind(handle(0x100)).is_none());
    }
}

//! [`StatusListener`] – observer interface for alarm, camera and sensor
//! updates, and the identity-keyed [`ListenerSet`] that holds them.

use std::sync::Arc;

use catpoint_types::AlarmStatus;

/// Receives notifications from the security service.
///
/// Callbacks run synchronously inside the service operation that caused
/// them. Implementations must not call back into the service.
pub trait StatusListener: Send + Sync {
    /// The alarm status was written, possibly with an unchanged value.
    fn notify(&self, status: AlarmStatus);

    /// A camera image was classified.
    fn cat_detected(&self, cat: bool);

    /// One or more sensors changed as part of a batch update.
    fn sensor_status_changed(&self);
}

/// Unordered set of listeners, keyed by the identity of the shared
/// allocation. Iteration order is unspecified.
#[derive(Default, Clone)]
pub struct ListenerSet {
    listeners: Vec<Arc<dyn StatusListener>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. Returns `false` when the same allocation is
    /// already registered.
    pub fn add(&mut self, listener: Arc<dyn StatusListener>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Unregister `listener`. Returns `false` when it was not registered.
    pub fn remove(&mut self, listener: &Arc<dyn StatusListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, listener));
        self.listeners.len() != before
    }

    pub fn contains(&self, listener: &Arc<dyn StatusListener>) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn StatusListener>> {
        self.listeners.iter()
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.listeners.len())
            .finish()
    }
}

// Compare data pointers only; vtable pointers may differ across codegen units.
fn same_listener(a: &Arc<dyn StatusListener>, b: &Arc<dyn StatusListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl StatusListener for Silent {
        fn notify(&self, _status: AlarmStatus) {}
        fn cat_detected(&self, _cat: bool) {}
        fn sensor_status_changed(&self) {}
    }

    fn silent() -> Arc<dyn StatusListener> {
        Arc::new(Silent)
    }

    #[test]
    fn duplicate_add_is_noop() {
        let mut set = ListenerSet::new();
        let listener = silent();
        assert!(set.add(listener.clone()));
        assert!(!set.add(listener.clone()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn distinct_allocations_are_distinct_listeners() {
        let mut set = ListenerSet::new();
        assert!(set.add(silent()));
        assert!(set.add(silent()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_unregistered_is_noop() {
        let mut set = ListenerSet::new();
        set.add(silent());
        assert!(!set.remove(&silent()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_registered_listener() {
        let mut set = ListenerSet::new();
        let listener = silent();
        set.add(listener.clone());
        assert!(set.contains(&listener));
        assert!(set.remove(&listener));
        assert!(set.is_empty());
    }
}

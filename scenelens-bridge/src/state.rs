use parking_lot::Mutex;
use std::sync::Arc;

/// Scene shared between the host application and the bridge task.
pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// Runs `f` under the lock. Keeps guards out of async scopes.
pub fn with_locked<T: ?Sized, R>(shared: &Mutex<T>, f: impl FnOnce(&mut T) -> R) -> R {
    let mut guard = shared.lock();
    f(&mut guard)
}

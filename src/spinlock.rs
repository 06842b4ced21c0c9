use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// A minimal spin-lock used as the batch-loss reducer (§4.6 "accumulate into
/// a single reducer under a spin-lock"). Unlike `std::sync::Mutex`, a locked
/// thread busy-waits instead of parking — appropriate here because each
/// critical section is a single floating-point addition.
pub struct SpinLock<T> {
    locked: AtomicBool,
    value: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    pub fn new(value: T) -> Self {
        SpinLock {
            locked: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Acquires the lock, runs `f` against the guarded value, releases it,
    /// and returns `f`'s result.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }

        let result = f(unsafe { &mut *self.value.get() });

        self.locked.store(false, Ordering::Release);
        result
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

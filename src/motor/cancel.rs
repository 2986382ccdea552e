//! Cooperative cancellation for step sequences.
//!
//! The driver polls a [`Cancel`] source before every step pulse, so a request
//! lands between steps and the motor is always left in a defined state.

use core::sync::atomic::{AtomicBool, Ordering};

/// A source the driver can poll for cancellation.
pub trait Cancel {
    /// Whether the current sequence should stop.
    fn is_cancelled(&self) -> bool;
}

/// Never cancels. Used by the plain `turn_step` entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancel for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancel for AtomicBool {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: Cancel + ?Sized> Cancel for &T {
    #[inline]
    fn is_cancelled(&self) -> bool {
        T::is_cancelled(self)
    }
}

/// Clonable cancellation flag that can be tripped from another thread or a
/// signal handler (std only).
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct CancelToken(std::sync::Arc<AtomicBool>);

#[cfg(feature = "std")]
impl CancelToken {
    /// Create an untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear a previous request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(feature = "std")]
impl Cancel for CancelToken {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::AiError;

/// Allows at most one outstanding request.
///
/// A second caller is turned away with [`AiError::Busy`] instead of queueing.
#[derive(Debug, Default)]
pub struct InFlightGate {
    busy: AtomicBool,
}

/// Held for the lifetime of a request. Dropping it reopens the gate, on
/// success, failure or cancellation alike.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    busy: &'a AtomicBool,
}

impl InFlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<InFlightGuard<'_>, AiError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AiError::Busy)?;
        Ok(InFlightGuard { busy: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_busy_until_guard_drops() {
        let gate = InFlightGate::new();

        let guard = gate.try_acquire().unwrap();
        assert!(gate.is_busy());
        assert!(matches!(gate.try_acquire(), Err(AiError::Busy)));

        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }
}

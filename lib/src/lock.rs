use crate::error::{ProfileError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared lock keeping exports and imports from overlapping on one profile store
///
/// Clones share the same flag. Hand one clone to every session that works
/// against the same store.
#[derive(Debug, Clone, Default)]
pub struct SessionLock {
    busy: Arc<AtomicBool>,
}

/// Held while a session is validating or applying; releases on drop
#[derive(Debug)]
pub struct SessionGuard {
    busy: Arc<AtomicBool>,
}

impl SessionLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<SessionGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ProfileError::Busy)?;
        Ok(SessionGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

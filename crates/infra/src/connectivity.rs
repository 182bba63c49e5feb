//! Simulated network reachability for the in-memory backends.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Connectivity state of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    /// Requests reach the backend.
    Online,
    /// Network unreachable; every request fails.
    Offline,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OfflineError {
    #[error("backend unreachable; operation requires network connection")]
    Offline,
}

/// Shared online/offline switch.
///
/// Tests flip it to exercise the network-failure paths of login, profile
/// resolution and course writes.
#[derive(Debug, Default)]
pub struct Connectivity {
    offline: AtomicBool,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectivityState {
        if self.is_offline() {
            ConnectivityState::Offline
        } else {
            ConnectivityState::Online
        }
    }

    pub fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn set_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Ensure the backend is reachable; return error if offline.
    pub fn require_online(&self) -> Result<(), OfflineError> {
        if self.is_offline() {
            Err(OfflineError::Offline)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles() {
        let connectivity = Connectivity::new();
        assert_eq!(connectivity.state(), ConnectivityState::Online);
        assert!(connectivity.require_online().is_ok());

        connectivity.set_offline();
        assert_eq!(connectivity.require_online(), Err(OfflineError::Offline));

        connectivity.set_online();
        assert!(!connectivity.is_offline());
    }
}

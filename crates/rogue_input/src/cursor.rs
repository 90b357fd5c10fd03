//! Pointer lock state

use serde::{Deserialize, Serialize};
use winit::window::CursorGrabMode;

/// How the OS pointer is constrained
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorLockMode {
    /// Visible and free to leave the window
    #[default]
    Free,
    /// Kept inside the window
    Confined,
    /// Hidden and pinned; only relative motion is reported
    Locked,
}

impl CursorLockMode {
    /// Whether the cursor should be hidden in this mode
    pub fn hides_cursor(self) -> bool {
        self == CursorLockMode::Locked
    }
}

impl From<CursorLockMode> for CursorGrabMode {
    fn from(mode: CursorLockMode) -> Self {
        match mode {
            CursorLockMode::Free => CursorGrabMode::None,
            CursorLockMode::Confined => CursorGrabMode::Confined,
            CursorLockMode::Locked => CursorGrabMode::Locked,
        }
    }
}

/// Something that owns the pointer lock, usually a window
pub trait PointerLock {
    fn lock_mode(&self) -> CursorLockMode;
    fn set_lock_mode(&mut self, mode: CursorLockMode);
}

/// In-memory pointer lock for headless runs and tests
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoftwarePointerLock {
    mode: CursorLockMode,
    changes: usize,
}

impl SoftwarePointerLock {
    pub fn new(mode: CursorLockMode) -> Self {
        Self { mode, changes: 0 }
    }

    /// Number of `set_lock_mode` calls seen
    pub fn changes(&self) -> usize {
        self.changes
    }
}

impl PointerLock for SoftwarePointerLock {
    fn lock_mode(&self) -> CursorLockMode {
        self.mode
    }

    fn set_lock_mode(&mut self, mode: CursorLockMode) {
        self.mode = mode;
        self.changes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_mode_conversion() {
        assert_eq!(CursorGrabMode::from(CursorLockMode::Free), CursorGrabMode::None);
        assert_eq!(CursorGrabMode::from(CursorLockMode::Confined), CursorGrabMode::Confined);
        assert_eq!(CursorGrabMode::from(CursorLockMode::Locked), CursorGrabMode::Locked);
    }

    #[test]
    fn test_software_lock_records_changes() {
        let mut lock = SoftwarePointerLock::default();
        assert_eq!(lock.lock_mode(), CursorLockMode::Free);
        lock.set_lock_mode(CursorLockMode::Locked);
        assert_eq!(lock.lock_mode(), CursorLockMode::Locked);
        assert_eq!(lock.changes(), 1);
        assert!(lock.lock_mode().hides_cursor());
    }
}

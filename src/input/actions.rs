//! Pointer capture policy and the few keys the host handles itself
//!
//! The look controller owns the pointer lock, so every decision here reads
//! [`LookController::is_enabled`] rather than a separate "captured" flag.

use rogue_input::{LookController, PointerLock};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Something the host should do in response to an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Hand the pointer to the look controller
    CaptureLook,
    /// Give the pointer back to whatever mode it had before capture
    ReleaseLook,
    Exit,
    /// Return the player to the scene spawn
    ResetPlayer,
    ToggleFullscreen,
}

impl InputAction {
    /// Apply a capture or release to the look controller
    ///
    /// Returns false for actions the host must handle itself.
    pub fn apply_to_look(self, look: &mut LookController, lock: &mut dyn PointerLock) -> bool {
        match self {
            InputAction::CaptureLook => look.enable(lock),
            InputAction::ReleaseLook => look.disable(lock),
            _ => return false,
        }
        true
    }
}

/// Maps window events to [`InputAction`]s given the look controller's state
///
/// - Left click while the pointer is free captures it
/// - Escape releases a captured pointer, or exits when already free
/// - Losing focus releases a captured pointer
/// - R resets the player, F toggles fullscreen
pub struct ActionMap;

impl ActionMap {
    pub fn key(key: KeyCode, state: ElementState, look: &LookController) -> Option<InputAction> {
        if state != ElementState::Pressed {
            return None;
        }

        match (key, look.is_enabled()) {
            (KeyCode::Escape, true) => Some(InputAction::ReleaseLook),
            (KeyCode::Escape, false) => Some(InputAction::Exit),
            (KeyCode::KeyR, _) => Some(InputAction::ResetPlayer),
            (KeyCode::KeyF, _) => Some(InputAction::ToggleFullscreen),
            _ => None,
        }
    }

    pub fn mouse_button(
        button: MouseButton,
        state: ElementState,
        look: &LookController,
    ) -> Option<InputAction> {
        let click = button == MouseButton::Left && state == ElementState::Pressed;
        (click && !look.is_enabled()).then_some(InputAction::CaptureLook)
    }

    pub fn focus(focused: bool, look: &LookController) -> Option<InputAction> {
        (!focused && look.is_enabled()).then_some(InputAction::ReleaseLook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rogue_core::{SceneGraph, Transform};
    use rogue_input::{CursorLockMode, LookSettings, SoftwarePointerLock};

    fn look() -> LookController {
        let mut graph = SceneGraph::new();
        let body = graph.add_node("body", Transform::identity());
        let camera = graph.add_node("camera", Transform::identity());
        LookController::new(LookSettings::default(), body, camera)
    }

    fn dispatch(action: Option<InputAction>, look: &mut LookController, lock: &mut SoftwarePointerLock) {
        let action = action.expect("an action");
        assert!(action.apply_to_look(look, lock));
    }

    #[test]
    fn test_click_captures_then_escape_restores() {
        let mut look = look();
        let mut lock = SoftwarePointerLock::new(CursorLockMode::Confined);

        let click = ActionMap::mouse_button(MouseButton::Left, ElementState::Pressed, &look);
        assert_eq!(click, Some(InputAction::CaptureLook));
        dispatch(click, &mut look, &mut lock);
        assert_eq!(lock.lock_mode(), CursorLockMode::Locked);

        // A second click while captured does nothing
        assert_eq!(ActionMap::mouse_button(MouseButton::Left, ElementState::Pressed, &look), None);

        let escape = ActionMap::key(KeyCode::Escape, ElementState::Pressed, &look);
        assert_eq!(escape, Some(InputAction::ReleaseLook));
        dispatch(escape, &mut look, &mut lock);
        assert_eq!(lock.lock_mode(), CursorLockMode::Confined);
        assert!(!look.is_enabled());
    }

    #[test]
    fn test_escape_exits_when_pointer_free() {
        let look = look();
        assert_eq!(
            ActionMap::key(KeyCode::Escape, ElementState::Pressed, &look),
            Some(InputAction::Exit)
        );
        assert_eq!(ActionMap::key(KeyCode::Escape, ElementState::Released, &look), None);
    }

    #[test]
    fn test_focus_loss_releases_only_when_captured() {
        let mut look = look();
        let mut lock = SoftwarePointerLock::new(CursorLockMode::Free);
        assert_eq!(ActionMap::focus(false, &look), None);

        look.enable(&mut lock);
        assert_eq!(ActionMap::focus(true, &look), None);
        let lost = ActionMap::focus(false, &look);
        assert_eq!(lost, Some(InputAction::ReleaseLook));
        dispatch(lost, &mut look, &mut lock);
        assert_eq!(lock.lock_mode(), CursorLockMode::Free);
    }

    #[test]
    fn test_host_keys_and_movement_keys() {
        let look = look();
        assert_eq!(
            ActionMap::key(KeyCode::KeyR, ElementState::Pressed, &look),
            Some(InputAction::ResetPlayer)
        );
        assert_eq!(
            ActionMap::key(KeyCode::KeyF, ElementState::Pressed, &look),
            Some(InputAction::ToggleFullscreen)
        );
        for key in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::ArrowUp, KeyCode::ArrowLeft] {
            assert_eq!(ActionMap::key(key, ElementState::Pressed, &look), None, "{:?}", key);
        }
    }

    #[test]
    fn test_host_actions_not_applied_to_look() {
        let mut look = look();
        let mut lock = SoftwarePointerLock::default();
        for action in [InputAction::Exit, InputAction::ResetPlayer, InputAction::ToggleFullscreen] {
            assert!(!action.apply_to_look(&mut look, &mut lock));
        }
        assert_eq!(lock.changes(), 0);
    }
}

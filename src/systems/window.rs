//! Window management system
//!
//! Handles window creation, pointer lock, fullscreen toggle, and title updates.

use std::sync::Arc;
use rogue_input::{CursorLockMode, PointerLock};
use rogue_math::Vec3;
use winit::{
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Manages the application window and cursor state
pub struct WindowSystem {
    window: Arc<Window>,
    lock_mode: CursorLockMode,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            lock_mode: CursorLockMode::Free,
            base_title: config.title.clone(),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Check if the pointer is held by the window
    pub fn is_cursor_captured(&self) -> bool {
        self.lock_mode != CursorLockMode::Free
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Update window title with position/state info
    pub fn update_title(&self, pos: Vec3, grounded: bool) {
        let title = format_title(&self.base_title, pos, grounded, self.is_cursor_captured());
        self.window.set_title(&title);
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

impl PointerLock for WindowSystem {
    fn lock_mode(&self) -> CursorLockMode {
        self.lock_mode
    }

    /// Apply a lock mode, falling back from Locked to Confined where the
    /// platform has no true pointer lock
    fn set_lock_mode(&mut self, mode: CursorLockMode) {
        let applied = match self.window.set_cursor_grab(CursorGrabMode::from(mode)) {
            Ok(()) => Some(mode),
            Err(_) if mode == CursorLockMode::Locked => self
                .window
                .set_cursor_grab(CursorGrabMode::Confined)
                .ok()
                .map(|_| CursorLockMode::Confined),
            Err(_) => None,
        };

        match applied {
            Some(applied) => {
                self.window.set_cursor_visible(!mode.hides_cursor());
                self.lock_mode = applied;
                match applied {
                    CursorLockMode::Free => log::info!("Cursor released - click to capture"),
                    _ => log::info!("Cursor captured ({:?}) - Escape to release", applied),
                }
            }
            None => log::warn!("Failed to set cursor lock mode {:?}", mode),
        }
    }
}

/// Window title with the player position and capture hint
pub fn format_title(base: &str, pos: Vec3, grounded: bool, captured: bool) -> String {
    let state = if grounded { "grounded" } else { "airborne" };
    let hint = if captured { "Esc to release" } else { "Click to capture" };
    format!(
        "{} - ({:.1}, {:.1}, {:.1}) {} [{}]",
        base, pos.x, pos.y, pos.z, state, hint
    )
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_formatting_captured() {
        let title = format_title("Test", Vec3::new(1.0, 2.0, 3.0), true, true);
        assert_eq!(title, "Test - (1.0, 2.0, 3.0) grounded [Esc to release]");
    }

    #[test]
    fn test_title_formatting_released() {
        let title = format_title("Test", Vec3::new(1.25, -0.5, 0.0), false, false);
        assert!(title.contains("(1.2, -0.5, 0.0)") || title.contains("(1.3, -0.5, 0.0)"));
        assert!(title.contains("airborne"));
        assert!(title.contains("Click to capture"));
    }
}

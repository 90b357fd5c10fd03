//! Rogue - First-person avatar controller
//!
//! Opens a window, loads the configured scene, and walks a capsule around it
//! with mouse look. Rendering is left to an external renderer; the window
//! title shows where the player is.

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use rogue::config::AppConfig;
use rogue::input::{ActionMap, InputAction};
use rogue::scene::{Level, Player, Scene, SceneBuilder};
use rogue::systems::{SimulationSystem, WindowSystem};
use rogue_input::InputState;
use rogue_math::Vec3;
use rogue_physics::MovementSettings;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    level: Level,
    player: Player,
    input: InputState,
    simulation: SimulationSystem,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let scene = Scene::load(&config.scene.path).unwrap_or_else(|e| {
            panic!("Failed to load scene '{}': {}", config.scene.path, e);
        });

        let spawn = scene.player_spawn.map(Vec3::from).unwrap_or(Vec3::ZERO);
        let level = SceneBuilder::new()
            .with_physics_config(config.simulation.to_physics_config())
            .add_scene(&scene)
            .unwrap_or_else(|e| panic!("Failed to build scene '{}': {}", scene.name, e))
            .add_player(spawn, scene.player_yaw.unwrap_or(0.0), &config.character)
            .unwrap_or_else(|e| panic!("Failed to add player: {}", e))
            .build();

        let Some(rig) = level.player else {
            panic!("Scene '{}' has no player rig", level.name);
        };

        let movement = config.movement.to_settings().unwrap_or_else(|e| {
            log::warn!("{}. Using default movement settings.", e);
            MovementSettings::default()
        });
        let player = Player::new(rig, config.look.to_settings(), movement);

        log::info!(
            "Loaded scene '{}' with {} colliders, player at {:?}",
            level.name,
            level.physics.static_colliders().len(),
            spawn
        );

        Self {
            input: InputState::with_settings(config.input.to_axis_settings()),
            simulation: SimulationSystem::new(config.simulation.max_frame_time),
            config,
            window: None,
            level,
            player,
        }
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::CaptureLook | InputAction::ReleaseLook => {
                if let Some(window) = &mut self.window {
                    action.apply_to_look(&mut self.player.look, window);
                }
            }
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetPlayer => self.player.reset(&mut self.level),
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match WindowSystem::create(event_loop, &self.config.window) {
                Ok(window) => {
                    window.request_redraw();
                    self.window = Some(window);
                }
                Err(e) => {
                    log::error!("{}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = ActionMap::key(key, event.state, &self.player.look) {
                        self.handle_action(event_loop, action);
                        return;
                    }
                    self.input.process_keyboard(key, event.state);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(action) = ActionMap::mouse_button(button, state, &self.player.look) {
                    self.handle_action(event_loop, action);
                }
            }

            WindowEvent::Focused(focused) => {
                if !focused {
                    // Keys released while unfocused never arrive
                    self.input.clear();
                }
                if let Some(action) = ActionMap::focus(focused, &self.player.look) {
                    self.handle_action(event_loop, action);
                }
            }

            WindowEvent::RedrawRequested => {
                let result = self.simulation.update(&mut self.input, &mut self.player, &mut self.level);

                if let Some(window) = &self.window {
                    if self.config.debug.show_overlay {
                        if let Some(pos) = self.level.player_position() {
                            window.update_title(pos, result.movement.grounded);
                        }
                    }
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.player.look.is_enabled() {
                self.input.process_mouse_motion(delta.0, delta.1);
            }
        }
    }
}

fn main() {
    let config = AppConfig::load();

    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting Rogue");

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create and run application
    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}

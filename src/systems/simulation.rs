//! Game simulation system
//!
//! Runs one tick in a fixed order:
//! - Delta time calculation (capped)
//! - Input axis smoothing
//! - Mouse look (only while the look controller holds the pointer)
//! - Locomotion through the physics world
//! - Clearing per-frame pointer motion

use std::time::Instant;
use rogue_input::{Axis, InputSource, InputState, LookOutput};
use rogue_physics::{MoveInput, MovementOutput};

use crate::scene::{Level, Player};

/// Result of a simulation update
#[derive(Clone, Copy, Debug)]
pub struct SimulationResult {
    /// Delta time actually simulated
    pub dt: f32,
    /// Look report, `None` while the look controller is disabled
    pub look: Option<LookOutput>,
    pub movement: MovementOutput,
}

/// Manages the game simulation loop
pub struct SimulationSystem {
    last_frame: Instant,
    max_frame_time: f32,
}

impl SimulationSystem {
    /// Create a new simulation system that never simulates more than
    /// `max_frame_time` seconds per frame
    pub fn new(max_frame_time: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            max_frame_time,
        }
    }

    /// Measure the time since the last frame, capped to the maximum
    pub fn frame_dt(&mut self) -> f32 {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.cap_dt(raw_dt)
    }

    /// Clamp a frame time into `[0, max_frame_time]`
    pub fn cap_dt(&self, raw_dt: f32) -> f32 {
        raw_dt.clamp(0.0, self.max_frame_time)
    }

    /// Run one simulation frame using the wall-clock delta
    pub fn update(&mut self, input: &mut InputState, player: &mut Player, level: &mut Level) -> SimulationResult {
        let dt = self.frame_dt();
        self.step(dt, input, player, level)
    }

    /// Run one simulation frame with an explicit delta
    pub fn step(
        &mut self,
        dt: f32,
        input: &mut InputState,
        player: &mut Player,
        level: &mut Level,
    ) -> SimulationResult {
        let dt = self.cap_dt(dt);

        // 1. Sample input
        input.update(dt);
        let (dx, dy) = input.pointer_delta();
        let move_input = MoveInput::new(input.axis(Axis::Vertical), input.axis(Axis::Horizontal));

        // 2. Look
        let look = if player.look.is_enabled() {
            Some(player.look.tick(dx, dy, dt, &mut level.graph))
        } else {
            None
        };

        // 3. Move
        let movement = player
            .movement
            .tick(move_input, dt, &mut level.graph, &mut level.physics);

        // 4. Pointer motion is consumed once
        input.end_frame();

        SimulationResult { dt, look, movement }
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(1.0 / 30.0)
    }
}

//! The player: rig handles plus both controllers

use rogue_core::TransformHierarchy;
use rogue_input::{pitch_rotation, LookController, LookSettings};
use rogue_physics::{MovementController, MovementSettings};

use super::scene_builder::{Level, PlayerRig};

/// Look and movement controllers bound to one rig
pub struct Player {
    pub rig: PlayerRig,
    pub look: LookController,
    pub movement: MovementController,
}

impl Player {
    pub fn new(rig: PlayerRig, look: LookSettings, movement: MovementSettings) -> Self {
        Self {
            look: LookController::new(look, rig.body, rig.camera),
            movement: MovementController::new(movement, rig.body, rig.capsule),
            rig,
        }
    }

    /// Put the body back at its spawn and level the camera
    pub fn reset(&mut self, level: &mut Level) {
        if level.graph.set_local(self.rig.body, self.rig.spawn).is_err() {
            log::warn!("Player body is no longer in the scene graph");
            return;
        }
        let pitch = self.look.settings().initial_pitch();
        self.look.set_pitch(pitch);
        level.graph.set_local_rotation(self.rig.camera, pitch_rotation(pitch));
        self.movement.reset();
        log::info!("Player reset to spawn {:?}", self.rig.spawn.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CharacterConfig;
    use crate::scene::SceneBuilder;
    use rogue_math::Vec3;
    use rogue_physics::MoveInput;

    #[test]
    fn test_reset_restores_spawn() {
        let mut level = SceneBuilder::new()
            .add_floor(0.0)
            .add_player(Vec3::new(0.0, 0.0, 4.0), 0.0, &CharacterConfig::default())
            .unwrap()
            .build();
        let mut player = Player::new(
            level.player.unwrap(),
            LookSettings::default(),
            MovementSettings::default(),
        );

        for _ in 0..10 {
            player.look.tick(0.5, 0.5, 0.1, &mut level.graph);
            player
                .movement
                .tick(MoveInput::new(1.0, 0.0), 0.1, &mut level.graph, &mut level.physics);
        }
        assert!(level.player_position().unwrap().z < 0.0);

        player.reset(&mut level);
        let pos = level.player_position().unwrap();
        assert!((pos - Vec3::new(0.0, 0.0, 4.0)).length() < 0.0001);
        assert_eq!(player.look.pitch(), 0.0);
        assert_eq!(player.movement.velocity(), Vec3::ZERO);
        assert!((level.graph.basis(player.rig.body).forward - Vec3::FORWARD).length() < 0.0001);
    }
}

// Scenes: the level scripts that populate a World and watch it each tick

use super::World;
use crate::config::{GameConfig, PlayerConfig};
use crate::entity::player::EYE_HEIGHT;
use crate::entity::{Player, Wall};
use crate::mesh::MeshLibrary;
use crate::registry::{EntityId, RegistryKind};
use crate::render::Light;
use glam::Vec3;

/// A level.
///
/// `setup` runs once when the level is loaded, `update` once per tick after
/// collision resolution, and `level_end` reports whether the level is over.
/// The core only reports completion; moving to another level is up to the
/// caller.
pub trait Scene {
    fn setup(&mut self, world: &mut World);

    fn update(&mut self, world: &mut World);

    fn level_end(&self, world: &World) -> bool;
}

/// Half the side length of the square arena floor.
const ARENA_HALF: f32 = 10.0;
const WALL_HEIGHT: f32 = 4.0;
const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 1.0, 6.0);

/// Walled square arena with a glass wall, a few pillars and the player.
///
/// The camera rides along at the player's eye. The level ends once it has
/// run for the configured duration; a duration of 0 never ends.
pub struct ArenaScene {
    player_config: PlayerConfig,
    duration_ticks: u64,
    meshes: MeshLibrary,
    player: Option<EntityId>,
    start_frame: u64,
}

impl ArenaScene {
    pub fn new(config: &GameConfig) -> Self {
        ArenaScene {
            player_config: config.player.clone(),
            duration_ticks: config.level_duration_ticks(),
            meshes: MeshLibrary::new(),
            player: None,
            start_frame: 0,
        }
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    fn build_walls(&self, world: &mut World) {
        let m = &self.meshes;
        let span = ARENA_HALF * 2.0;
        let y = WALL_HEIGHT / 2.0;

        // Floor, top surface at y = 0
        world.spawn(
            RegistryKind::Walls,
            Box::new(Wall::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(span, 1.0, span), m)),
        );

        let outer = [
            (Vec3::new(0.0, y, -ARENA_HALF), Vec3::new(span, WALL_HEIGHT, 1.0)),
            (Vec3::new(0.0, y, ARENA_HALF), Vec3::new(span, WALL_HEIGHT, 1.0)),
            (Vec3::new(-ARENA_HALF, y, 0.0), Vec3::new(1.0, WALL_HEIGHT, span)),
        ];
        for (center, size) in outer {
            world.spawn(RegistryKind::Walls, Box::new(Wall::new(center, size, m)));
        }
        world.spawn(
            RegistryKind::Walls,
            Box::new(Wall::glass(Vec3::new(ARENA_HALF, y, 0.0), Vec3::new(1.0, WALL_HEIGHT, span), m)),
        );

        for x in [-4.0, 4.0] {
            world.spawn(
                RegistryKind::Walls,
                Box::new(Wall::new(Vec3::new(x, 1.0, -3.0), Vec3::new(1.0, 2.0, 1.0), m)),
            );
        }
    }

    /// Moves the camera to the player's eye and matches its heading.
    fn follow_player(&self, world: &mut World) {
        let Some(id) = self.player else {
            return;
        };
        let Some(player) = world.entities.position_of(id).and_then(|i| world.entities.get(i)) else {
            return;
        };
        let transform = player.transform();
        let eye = transform.translation + Vec3::new(0.0, EYE_HEIGHT, 0.0);
        let yaw = transform.rotation_degrees.y;

        world.camera.position = eye;
        world.camera.yaw_degrees = yaw;
    }
}

impl Scene for ArenaScene {
    fn setup(&mut self, world: &mut World) {
        self.build_walls(world);

        let player = Player::new(PLAYER_SPAWN, &self.player_config, &self.meshes);
        self.player = Some(world.spawn(RegistryKind::Entities, Box::new(player)));

        world.set_light(0, Some(Light::new(Vec3::new(0.0, 8.0, 0.0), Vec3::new(0.9, 0.85, 0.8))));
        world.set_light(1, Some(Light::new(Vec3::new(-8.0, 3.0, 8.0), Vec3::new(0.2, 0.3, 0.6))));
        world.set_light(2, Some(Light::new(Vec3::new(8.0, 3.0, -8.0), Vec3::new(0.6, 0.3, 0.2))));

        self.start_frame = world.frame_count;
        self.follow_player(world);
        log::info!(
            "Arena ready: {} walls, {} entities",
            world.walls.len(),
            world.entities.len()
        );
    }

    fn update(&mut self, world: &mut World) {
        self.follow_player(world);
    }

    fn level_end(&self, world: &World) -> bool {
        self.duration_ticks > 0 && world.frame_count.saturating_sub(self.start_frame) >= self.duration_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::input::LogicalKey;

    fn setup(config: &GameConfig) -> (World, ArenaScene) {
        let mut world = World::from_config(config);
        let mut scene = ArenaScene::new(config);
        scene.setup(&mut world);
        (world, scene)
    }

    #[test]
    fn test_setup_builds_arena() {
        let (world, scene) = setup(&GameConfig::default());

        assert_eq!(world.entities.count_kind(EntityKind::Player), 1);
        assert_eq!(world.walls.len(), 7);
        assert!(world.soft_entities.is_empty());
        assert_eq!(world.lights.iter().flatten().count(), 3);

        let translucent = world
            .walls
            .iter()
            .filter(|w| w.models().iter().flatten().any(|m| m.is_alpha_required()))
            .count();
        assert_eq!(translucent, 1);
        assert!(scene.player_id().is_some());
    }

    #[test]
    fn test_camera_follows_player() {
        let (mut world, mut scene) = setup(&GameConfig::default());
        assert!(world.camera.position.abs_diff_eq(PLAYER_SPAWN + Vec3::new(0.0, EYE_HEIGHT, 0.0), 1e-6));

        world.input.set_key(LogicalKey::Q, true);
        world.update_all();
        scene.update(&mut world);
        assert_eq!(world.camera.yaw_degrees, 3.0);
    }

    #[test]
    fn test_player_stands_on_floor() {
        let (mut world, mut scene) = setup(&GameConfig::default());
        for _ in 0..60 {
            world.update_all();
            world.resolve_collisions();
            scene.update(&mut world);
        }
        let player = world.find_kind(EntityKind::Player).map(|p| p.bounds().aabb());
        let feet = player.map(|aabb| aabb.min.y).unwrap_or(f32::NAN);
        assert!(feet.abs() < 0.05, "feet at {feet}");
    }

    #[test]
    fn test_level_ends_after_duration() {
        let config = GameConfig {
            tick_rate_hz: 10,
            level_duration_secs: 2,
            ..GameConfig::default()
        };
        let (mut world, scene) = setup(&config);

        world.frame_count = 19;
        assert!(!scene.level_end(&world));
        world.frame_count = 20;
        assert!(scene.level_end(&world));
    }

    #[test]
    fn test_zero_duration_never_ends() {
        let config = GameConfig {
            level_duration_secs: 0,
            ..GameConfig::default()
        };
        let (mut world, scene) = setup(&config);
        world.frame_count = u64::MAX;
        assert!(!scene.level_end(&world));
    }
}

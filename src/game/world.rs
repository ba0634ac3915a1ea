// World struct and entity management
//
// The World owns everything the simulation touches during a tick: the three
// entity registries, the camera, the light slots, the latched input and the
// queue of entities spawned mid-pass. Nothing in the core reaches for global
// state; the scheduler hands the World to whoever needs it.

use crate::camera::Camera;
use crate::collision;
use crate::config::GameConfig;
use crate::entity::{EntityKind, GameEntity, SpawnQueue, UpdateContext};
use crate::input::InputState;
use crate::registry::{EntityId, Registry, RegistryKind};
use crate::render::{Light, LIGHT_COUNT};
use glam::Vec3;

/// Background colour used when no config overrides it.
const DEFAULT_CLEAR_COLOR: Vec3 = Vec3::new(0.05, 0.075, 0.1);
const DEFAULT_AMBIENT_COLOR: Vec3 = Vec3::new(0.1, 0.05, 0.075);

/// Update order of the registries within a tick.
const UPDATE_ORDER: [RegistryKind; 3] = [RegistryKind::Entities, RegistryKind::Walls, RegistryKind::SoftEntities];

/// World encapsulates all entities and shared simulation state
pub struct World {
    pub entities: Registry,
    pub walls: Registry,
    pub soft_entities: Registry,
    pub camera: Camera,
    pub lights: [Option<Light>; LIGHT_COUNT],
    pub ambient_color: Vec3,
    pub clear_color: Vec3,
    pub input: InputState,
    pub gravity: Vec3,
    /// Ticks simulated so far.
    pub frame_count: u64,
    next_id: u64,
    spawns: SpawnQueue,
}

impl World {
    pub fn new(camera: Camera, gravity: Vec3) -> Self {
        World {
            entities: Registry::new(RegistryKind::Entities),
            walls: Registry::new(RegistryKind::Walls),
            soft_entities: Registry::new(RegistryKind::SoftEntities),
            camera,
            lights: [None; LIGHT_COUNT],
            ambient_color: DEFAULT_AMBIENT_COLOR,
            clear_color: DEFAULT_CLEAR_COLOR,
            input: InputState::new(),
            gravity,
            frame_count: 0,
            next_id: 0,
            spawns: SpawnQueue::new(),
        }
    }

    /// Builds an empty world with camera, colours and gravity from `config`.
    pub fn from_config(config: &GameConfig) -> Self {
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let mut world = World::new(Camera::new(&config.camera, aspect), config.gravity);
        world.clear_color = config.render.clear_color;
        world.ambient_color = config.render.ambient_color;
        world
    }

    pub fn registry(&self, kind: RegistryKind) -> &Registry {
        match kind {
            RegistryKind::Entities => &self.entities,
            RegistryKind::Walls => &self.walls,
            RegistryKind::SoftEntities => &self.soft_entities,
        }
    }

    pub fn registry_mut(&mut self, kind: RegistryKind) -> &mut Registry {
        match kind {
            RegistryKind::Entities => &mut self.entities,
            RegistryKind::Walls => &mut self.walls,
            RegistryKind::SoftEntities => &mut self.soft_entities,
        }
    }

    /// All registries in update order.
    pub fn registries(&self) -> [&Registry; 3] {
        [&self.entities, &self.walls, &self.soft_entities]
    }

    pub fn entity_count(&self) -> usize {
        self.registries().iter().map(|r| r.len()).sum()
    }

    /// First entity of `kind` in any registry.
    pub fn find_kind(&self, kind: EntityKind) -> Option<&dyn GameEntity> {
        self.registries().into_iter().find_map(|r| r.find_kind(kind))
    }

    /// Files `entity` into `target` right away and returns its id.
    ///
    /// Only for use between passes (level setup, tests). Entities created
    /// while a pass is running go through the spawn queue instead.
    pub fn spawn(&mut self, target: RegistryKind, entity: Box<dyn GameEntity>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.registry_mut(target).push(id, entity);
        id
    }

    /// Moves queued spawns into their target registries, in spawn order.
    pub fn flush_spawns(&mut self) -> usize {
        let pending: Vec<_> = self.spawns.drain().collect();
        let count = pending.len();
        for (target, entity) in pending {
            self.spawn(target, entity);
        }
        count
    }

    /// Runs one registry's update pass.
    fn update_registry(&mut self, kind: RegistryKind) {
        // Rust Learning: destructuring `self` splits the borrow so the
        // registry can be mutated while the context borrows other fields
        let World {
            entities,
            walls,
            soft_entities,
            input,
            gravity,
            spawns,
            ..
        } = self;
        let registry = match kind {
            RegistryKind::Entities => entities,
            RegistryKind::Walls => walls,
            RegistryKind::SoftEntities => soft_entities,
        };
        let mut ctx = UpdateContext {
            input,
            gravity: *gravity,
            spawns,
        };
        registry.update_all(&mut ctx);
    }

    /// Updates entities, walls and soft entities, in that order.
    ///
    /// Anything spawned during a registry's pass is filed once that pass is
    /// over, so newcomers are not updated in the tick they appear unless
    /// their target registry has yet to be updated.
    pub fn update_all(&mut self) {
        for kind in UPDATE_ORDER {
            self.update_registry(kind);
            self.flush_spawns();
        }
    }

    /// Self-collision pass over one registry.
    pub fn check_collisions_self(&mut self, kind: RegistryKind) {
        let World {
            entities,
            walls,
            soft_entities,
            spawns,
            ..
        } = self;
        let registry = match kind {
            RegistryKind::Entities => entities,
            RegistryKind::Walls => walls,
            RegistryKind::SoftEntities => soft_entities,
        };
        collision::check_collisions_self(registry, spawns);
    }

    /// Cross-collision pass between two registries.
    ///
    /// # Panics
    ///
    /// If `a` and `b` name the same registry.
    pub fn check_collisions(&mut self, a: RegistryKind, b: RegistryKind) {
        assert_ne!(a, b, "cross-collision pass needs two distinct registries");

        let World {
            entities,
            walls,
            soft_entities,
            spawns,
            ..
        } = self;
        let mut slots = [Some(entities), Some(walls), Some(soft_entities)];
        let index = |kind: RegistryKind| match kind {
            RegistryKind::Entities => 0,
            RegistryKind::Walls => 1,
            RegistryKind::SoftEntities => 2,
        };
        if let (Some(first), Some(second)) = (slots[index(a)].take(), slots[index(b)].take()) {
            collision::check_collisions(first, second, spawns);
        }
    }

    /// The four collision passes of a tick, in their fixed order.
    ///
    /// Spawns are flushed after each pass, so an explosion created by a
    /// grenade hitting a wall already takes part in the passes that follow.
    pub fn resolve_collisions(&mut self) {
        self.check_collisions_self(RegistryKind::Entities);
        self.flush_spawns();
        self.check_collisions(RegistryKind::Entities, RegistryKind::Walls);
        self.flush_spawns();
        self.check_collisions(RegistryKind::Entities, RegistryKind::SoftEntities);
        self.flush_spawns();
        self.check_collisions(RegistryKind::Walls, RegistryKind::SoftEntities);
        self.flush_spawns();
    }

    /// Stores `light` in slot `slot`. Out-of-range slots are ignored.
    pub fn set_light(&mut self, slot: usize, light: Option<Light>) {
        if let Some(entry) = self.lights.get_mut(slot) {
            *entry = light;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::entity::{Grenade, Wall};
    use crate::mesh::MeshLibrary;
    use crate::testing::{CallLog, Probe};

    fn world() -> World {
        World::new(Camera::new(&CameraConfig::default(), 1.0), Vec3::ZERO)
    }

    #[test]
    fn test_ids_are_unique_across_registries() {
        let log = CallLog::default();
        let mut world = world();
        let a = world.spawn(RegistryKind::Entities, Box::new(Probe::new("a", &log)));
        let b = world.spawn(RegistryKind::Walls, Box::new(Probe::new("b", &log)));
        let c = world.spawn(RegistryKind::SoftEntities, Box::new(Probe::new("c", &log)));
        assert!(a != b && b != c && a != c);
        assert_eq!(world.entity_count(), 3);
        assert!(world.walls.contains(b));
    }

    #[test]
    fn test_update_visits_registries_in_order() {
        let log = CallLog::default();
        let mut world = world();
        world.spawn(RegistryKind::SoftEntities, Box::new(Probe::new("soft", &log)));
        world.spawn(RegistryKind::Walls, Box::new(Probe::new("wall", &log)));
        world.spawn(RegistryKind::Entities, Box::new(Probe::new("mob", &log)));

        world.update_all();
        assert_eq!(log.updates(), vec!["mob", "wall", "soft"]);
    }

    #[test]
    fn test_spawns_flushed_after_pass() {
        let mut world = world();
        let meshes = MeshLibrary::new();
        world.spawn(
            RegistryKind::Entities,
            Box::new(Grenade::new(Vec3::new(0.0, 0.4, 0.0), Vec3::NEG_Y, 0.1, 0, &meshes)),
        );
        world.spawn(
            RegistryKind::Walls,
            Box::new(Wall::new(Vec3::ZERO, Vec3::new(4.0, 0.5, 4.0), &meshes)),
        );

        world.resolve_collisions();
        assert_eq!(world.entities.len(), 0);
        assert_eq!(world.walls.len(), 1);
        assert_eq!(world.soft_entities.count_kind(EntityKind::Explosion), 1);
    }

    #[test]
    #[should_panic(expected = "two distinct registries")]
    fn test_cross_pass_on_same_registry_panics() {
        let mut world = world();
        world.check_collisions(RegistryKind::Walls, RegistryKind::Walls);
    }

    #[test]
    fn test_light_slots() {
        let mut world = world();
        world.set_light(7, Some(Light::new(Vec3::Y, Vec3::ONE)));
        world.set_light(LIGHT_COUNT, Some(Light::new(Vec3::Y, Vec3::ONE)));
        assert_eq!(world.lights.iter().flatten().count(), 1);
    }

    #[test]
    fn test_from_config_copies_colours() {
        let mut config = GameConfig::default();
        config.render.clear_color = Vec3::new(0.2, 0.3, 0.4);
        let world = World::from_config(&config);
        assert_eq!(world.clear_color, Vec3::new(0.2, 0.3, 0.4));
        assert_eq!(world.gravity, config.gravity);
        assert!(world.registries().iter().all(|r| r.is_empty()));
    }
}

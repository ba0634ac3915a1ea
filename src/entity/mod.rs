//! Game entities: the polymorphic things that live in the registries.
//!
//! Every entity embeds an `EntityCore` (transform, velocity, model slots,
//! collision shape, delete flag) and implements `GameEntity` on top of it.
//! The default trait methods cover the shared behaviour; variants override
//! `update` and `on_collide` to give each kind its personality.
//!
//! # Lifecycle
//!
//! An entity never removes itself. It raises its delete flag, and the pass
//! that is currently iterating its registry (update or collision) erases it
//! right after the callback returns. New entities are never inserted directly
//! either: they go onto the `SpawnQueue` and the world files them into their
//! target registry once the running pass is over.

pub mod bullet;
pub mod explosion;
pub mod grenade;
pub mod player;
pub mod wall;

pub use bullet::Bullet;
pub use explosion::Explosion;
pub use grenade::Grenade;
pub use player::Player;
pub use wall::Wall;

use crate::collision::{self, Bounds, Shape};
use crate::input::InputState;
use crate::model::{DrawableEntity, Transform};
use crate::registry::RegistryKind;
use glam::Vec3;

/// Number of model slots per entity. Most entities use one.
pub const MAX_MODELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Bullet,
    Grenade,
    Explosion,
    Wall,
}

/// State shared by every entity variant.
#[derive(Debug, Clone)]
pub struct EntityCore {
    pub transform: Transform,
    pub velocity: Vec3,
    models: [Option<DrawableEntity>; MAX_MODELS],
    shape: Shape,
    delete: bool,
}

impl EntityCore {
    pub fn new(position: Vec3, shape: Shape) -> Self {
        EntityCore {
            transform: Transform::from_translation(position),
            velocity: Vec3::ZERO,
            models: Default::default(),
            shape,
            delete: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    /// Puts `model` into slot `slot`. Out-of-range slots are ignored.
    pub fn set_model(&mut self, slot: usize, model: DrawableEntity) {
        if let Some(entry) = self.models.get_mut(slot) {
            *entry = Some(model);
        }
    }

    pub fn clear_model(&mut self, slot: usize) {
        if let Some(entry) = self.models.get_mut(slot) {
            *entry = None;
        }
    }

    pub fn model_mut(&mut self, slot: usize) -> Option<&mut DrawableEntity> {
        self.models.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn models(&self) -> &[Option<DrawableEntity>; MAX_MODELS] {
        &self.models
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    /// World-space collision volume.
    pub fn bounds(&self) -> Bounds {
        self.shape.bounds_at(self.transform.translation, self.transform.scale)
    }

    pub fn to_delete(&self) -> bool {
        self.delete
    }

    pub fn set_delete(&mut self) {
        self.delete = true;
    }
}

/// Inputs an entity may read or act on during `update`.
pub struct UpdateContext<'a> {
    pub input: &'a InputState,
    pub gravity: Vec3,
    pub spawns: &'a mut SpawnQueue,
}

/// Anything simulated and drawn by the core loop.
pub trait GameEntity {
    fn kind(&self) -> EntityKind;

    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    /// Advances the entity by one tick. May raise the delete flag.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Reacts to touching `other`. Both participants of a collision get this
    /// call; each decides only about itself.
    fn on_collide(&mut self, _other: &dyn GameEntity, _spawns: &mut SpawnQueue) {}

    /// Symmetric and free of side effects: `a.did_collide(b) == b.did_collide(a)`.
    fn did_collide(&self, other: &dyn GameEntity) -> bool {
        collision::collides_with(self.kind(), other.kind())
            && self.bounds().intersects(&other.bounds())
    }

    fn bounds(&self) -> Bounds {
        self.core().bounds()
    }

    fn transform(&self) -> &Transform {
        &self.core().transform
    }

    fn models(&self) -> &[Option<DrawableEntity>; MAX_MODELS] {
        self.core().models()
    }

    fn to_delete(&self) -> bool {
        self.core().to_delete()
    }

    fn set_delete(&mut self) {
        self.core_mut().set_delete();
    }
}

/// Entities created during a pass, waiting to be filed into a registry.
#[derive(Default)]
pub struct SpawnQueue {
    pending: Vec<(RegistryKind, Box<dyn GameEntity>)>,
}

impl SpawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, target: RegistryKind, entity: Box<dyn GameEntity>) {
        self.pending.push((target, entity));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Hands out queued entities in the order they were spawned.
    pub fn drain(&mut self) -> impl Iterator<Item = (RegistryKind, Box<dyn GameEntity>)> + '_ {
        self.pending.drain(..)
    }
}

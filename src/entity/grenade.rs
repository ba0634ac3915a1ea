use super::{EntityCore, EntityKind, Explosion, GameEntity, SpawnQueue, UpdateContext};
use crate::collision::{self, Shape};
use crate::mesh::MeshLibrary;
use crate::model::DrawableEntity;
use crate::registry::RegistryKind;
use glam::Vec3;

/// Velocity kept after bouncing off something.
const BOUNCE_DAMPING: f32 = 0.5;
/// Ticks an unexploded grenade may stay in flight before it is dropped as a dud.
pub const MAX_FLIGHT_TICKS: u32 = 300;

/// Tumbling, gravity-bound projectile that turns into an `Explosion`.
///
/// With a fuse of 0 the grenade goes off on the first thing it touches. With
/// a positive fuse it bounces around until the fuse burns down, then goes off
/// wherever it is. A grenade that has neither hit anything nor burnt its
/// fuse within `MAX_FLIGHT_TICKS` is removed without exploding.
pub struct Grenade {
    core: EntityCore,
    fuse_ticks: u32,
    flight_ticks_left: u32,
    meshes: MeshLibrary,
}

impl Grenade {
    pub fn new(position: Vec3, direction: Vec3, force: f32, fuse_ticks: u32, meshes: &MeshLibrary) -> Self {
        let mut core = EntityCore::new(position, Shape::Sphere { radius: 1.0 });
        core.velocity = direction.normalize_or_zero() * force;
        core.transform.scale_by(Vec3::splat(0.2));
        core.set_model(
            0,
            DrawableEntity::new(meshes.sphere.clone())
                .with_diffuse_color(1.0, 0.0, 0.0)
                .with_scale(0.75, 0.75, 0.75)
                .with_shininess(100.0),
        );
        Grenade {
            core,
            fuse_ticks,
            flight_ticks_left: MAX_FLIGHT_TICKS,
            meshes: meshes.clone(),
        }
    }

    fn explode(&mut self, spawns: &mut SpawnQueue) {
        if self.to_delete() {
            return;
        }
        let explosion = Explosion::new(self.core.position(), &self.meshes);
        spawns.spawn(RegistryKind::SoftEntities, Box::new(explosion));
        self.set_delete();
    }

    /// Pushes the grenade out of `other` and reflects the velocity on the
    /// axis of contact.
    fn bounce_off(&mut self, other: &dyn GameEntity) {
        let push = collision::separation(&self.bounds().aabb(), &other.bounds().aabb());
        self.core.transform.translate(push);

        let v = &mut self.core.velocity;
        if push.x != 0.0 {
            v.x = -v.x;
        }
        if push.y != 0.0 {
            v.y = -v.y;
        }
        if push.z != 0.0 {
            v.z = -v.z;
        }
        *v *= BOUNCE_DAMPING;
    }
}

impl GameEntity for Grenade {
    fn kind(&self) -> EntityKind {
        EntityKind::Grenade
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.core.velocity += ctx.gravity;
        let velocity = self.core.velocity;
        self.core.transform.translate(velocity);
        self.core.transform.rotate(15.0, 0.0, 15.0);

        if self.fuse_ticks > 0 {
            self.fuse_ticks -= 1;
            if self.fuse_ticks == 0 {
                self.explode(ctx.spawns);
                return;
            }
        }

        self.flight_ticks_left = self.flight_ticks_left.saturating_sub(1);
        if self.flight_ticks_left == 0 {
            log::debug!("grenade dud at {}", self.core.position());
            self.set_delete();
        }
    }

    fn on_collide(&mut self, other: &dyn GameEntity, spawns: &mut SpawnQueue) {
        if self.fuse_ticks == 0 {
            self.explode(spawns);
        } else {
            self.bounce_off(other);
        }
    }
}

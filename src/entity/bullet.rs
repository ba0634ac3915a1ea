use super::{EntityCore, EntityKind, GameEntity, SpawnQueue, UpdateContext};
use crate::collision::Shape;
use crate::mesh::MeshLibrary;
use crate::model::DrawableEntity;
use glam::Vec3;

/// Straight-flying projectile with a limited lifetime.
///
/// Gone when it hits anything or when its lifetime runs out, whichever comes
/// first.
pub struct Bullet {
    core: EntityCore,
    ticks_left: u32,
}

impl Bullet {
    pub fn new(position: Vec3, direction: Vec3, speed: f32, lifetime_ticks: u32, meshes: &MeshLibrary) -> Self {
        let mut core = EntityCore::new(position, Shape::Sphere { radius: 1.0 });
        core.velocity = direction.normalize_or_zero() * speed;
        core.transform.scale_by(Vec3::splat(0.1));
        core.set_model(
            0,
            DrawableEntity::new(meshes.sphere.clone())
                .with_diffuse_color(1.0, 0.9, 0.3)
                .with_shininess(60.0),
        );
        Bullet {
            core,
            ticks_left: lifetime_ticks,
        }
    }
}

impl GameEntity for Bullet {
    fn kind(&self) -> EntityKind {
        EntityKind::Bullet
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        let velocity = self.core.velocity;
        self.core.transform.translate(velocity);

        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left == 0 {
            self.set_delete();
        }
    }

    fn on_collide(&mut self, _other: &dyn GameEntity, _spawns: &mut SpawnQueue) {
        self.set_delete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;

    fn tick(bullet: &mut Bullet) {
        let input = InputState::new();
        let mut spawns = SpawnQueue::new();
        let mut ctx = UpdateContext {
            input: &input,
            gravity: Vec3::new(0.0, -1.0, 0.0),
            spawns: &mut spawns,
        };
        bullet.update(&mut ctx);
    }

    #[test]
    fn test_flies_straight_ignoring_gravity() {
        let mut bullet = Bullet::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), 0.5, 10, &MeshLibrary::new());
        tick(&mut bullet);
        tick(&mut bullet);
        assert!(bullet.transform().translation.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
        assert!(!bullet.to_delete());
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut bullet = Bullet::new(Vec3::ZERO, Vec3::X, 1.0, 3, &MeshLibrary::new());
        tick(&mut bullet);
        tick(&mut bullet);
        assert!(!bullet.to_delete());
        tick(&mut bullet);
        assert!(bullet.to_delete());
    }
}

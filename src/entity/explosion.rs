use super::{EntityCore, EntityKind, GameEntity, UpdateContext};
use crate::collision::Shape;
use crate::mesh::MeshLibrary;
use crate::model::DrawableEntity;
use glam::Vec3;

const LIFETIME_TICKS: u32 = 15;
const START_RADIUS: f32 = 0.5;
const GROWTH_PER_TICK: f32 = 0.12;

/// Health a player loses for every tick spent inside a fireball.
pub const EXPLOSION_DAMAGE: f32 = 2.0;

/// Expanding translucent fireball. Lives in the soft-entity registry, hurts
/// players it overlaps and fades out on its own.
pub struct Explosion {
    core: EntityCore,
    age: u32,
}

impl Explosion {
    pub fn new(position: Vec3, meshes: &MeshLibrary) -> Self {
        let mut core = EntityCore::new(position, Shape::Sphere { radius: 1.0 });
        core.transform.scale_by(Vec3::splat(START_RADIUS));
        core.set_model(
            0,
            DrawableEntity::new(meshes.sphere.clone())
                .with_diffuse_color(1.0, 0.55, 0.1)
                .with_shininess(1.0)
                .with_alpha(0.7),
        );
        Explosion { core, age: 0 }
    }

    pub fn radius(&self) -> f32 {
        self.core.transform.scale.x
    }
}

impl GameEntity for Explosion {
    fn kind(&self) -> EntityKind {
        EntityKind::Explosion
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.age += 1;
        self.core.transform.scale = Vec3::splat(START_RADIUS + GROWTH_PER_TICK * self.age as f32);

        let fade = 1.0 - self.age as f32 / LIFETIME_TICKS as f32;
        if let Some(model) = self.core.model_mut(0) {
            // Stay strictly below 1 so the fireball is always blended
            model.set_alpha((0.7 * fade).clamp(0.05, 0.7));
        }

        if self.age >= LIFETIME_TICKS {
            self.set_delete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SpawnQueue;
    use crate::input::InputState;

    #[test]
    fn test_grows_fades_and_expires() {
        let mut explosion = Explosion::new(Vec3::ZERO, &MeshLibrary::new());
        let input = InputState::new();
        let mut spawns = SpawnQueue::new();
        let mut ctx = UpdateContext {
            input: &input,
            gravity: Vec3::ZERO,
            spawns: &mut spawns,
        };

        let start = explosion.radius();
        for _ in 0..LIFETIME_TICKS - 1 {
            explosion.update(&mut ctx);
            assert!(!explosion.to_delete());
            let model = explosion.models()[0].as_ref().unwrap();
            assert!(model.is_alpha_required());
        }
        assert!(explosion.radius() > start);

        explosion.update(&mut ctx);
        assert!(explosion.to_delete());
    }
}

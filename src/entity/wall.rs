use super::{EntityCore, EntityKind, GameEntity};
use crate::collision::Shape;
use crate::mesh::MeshLibrary;
use crate::model::DrawableEntity;
use glam::Vec3;

/// Static axis-aligned box. Walls never move and never delete themselves;
/// everything else reacts to them.
pub struct Wall {
    core: EntityCore,
}

impl Wall {
    /// Opaque wall centred on `center` with the given full `size`.
    pub fn new(center: Vec3, size: Vec3, meshes: &MeshLibrary) -> Self {
        let mut core = EntityCore::new(center, Shape::Box { half_extents: Vec3::splat(0.5) });
        core.transform.scale_by(size);
        core.set_model(
            0,
            DrawableEntity::new(meshes.cube.clone())
                .with_diffuse_color(0.55, 0.55, 0.6)
                .with_shininess(5.0),
        );
        Wall { core }
    }

    /// Translucent wall, drawn in the blended pass.
    pub fn glass(center: Vec3, size: Vec3, meshes: &MeshLibrary) -> Self {
        let mut wall = Wall::new(center, size, meshes);
        if let Some(model) = wall.core.model_mut(0) {
            model.set_diffuse_color(0.4, 0.7, 0.9);
            model.material.shininess = 80.0;
            model.set_alpha(0.35);
        }
        wall
    }
}

impl GameEntity for Wall {
    fn kind(&self) -> EntityKind {
        EntityKind::Wall
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Bounds;

    #[test]
    fn test_bounds_follow_size() {
        let wall = Wall::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(10.0, 2.0, 1.0), &MeshLibrary::new());
        let Bounds::Aabb(aabb) = wall.bounds() else {
            panic!("walls are boxes");
        };
        assert!(aabb.min.abs_diff_eq(Vec3::new(-5.0, 0.0, -0.5), 1e-5));
        assert!(aabb.max.abs_diff_eq(Vec3::new(5.0, 2.0, 0.5), 1e-5));
    }

    #[test]
    fn test_glass_is_translucent() {
        let meshes = MeshLibrary::new();
        let solid = Wall::new(Vec3::ZERO, Vec3::ONE, &meshes);
        let glass = Wall::glass(Vec3::ZERO, Vec3::ONE, &meshes);

        let alpha = |w: &Wall| w.models()[0].as_ref().map(DrawableEntity::is_alpha_required);
        assert_eq!(alpha(&solid), Some(false));
        assert_eq!(alpha(&glass), Some(true));
    }
}

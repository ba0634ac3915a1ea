//! Drawable models: a mesh, a material and a local transform.
//!
//! An entity owns up to `MAX_MODELS` of these. The renderer combines each
//! model's local matrix with its owner's transform to get a world matrix.

use crate::mesh::Mesh;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::rc::Rc;

/// Translate / rotate / scale, composed as `T * R * S`.
///
/// Rotation is kept as XYZ Euler angles in degrees so per-tick spins such as
/// "15° about X and Z" accumulate naturally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation_degrees: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            translation: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Transform {
            translation,
            ..Transform::default()
        }
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
    }

    /// Adds to the Euler angles, wrapping each into `[0, 360)`.
    pub fn rotate(&mut self, x: f32, y: f32, z: f32) {
        let r = self.rotation_degrees + Vec3::new(x, y, z);
        self.rotation_degrees = Vec3::new(r.x.rem_euclid(360.0), r.y.rem_euclid(360.0), r.z.rem_euclid(360.0));
    }

    /// Multiplies the current scale component-wise.
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
    }

    pub fn rotation(&self) -> Quat {
        let r = self.rotation_degrees;
        Quat::from_euler(EulerRot::XYZ, r.x.to_radians(), r.y.to_radians(), r.z.to_radians())
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.translation)
    }
}

/// Surface parameters for the lighting model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse: Vec3,
    pub shininess: f32,
    /// Opacity in `[0, 1]`. Anything below 1 goes through the blended pass.
    pub alpha: f32,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            diffuse: Vec3::splat(0.8),
            shininess: 10.0,
            alpha: 1.0,
        }
    }
}

impl Material {
    pub fn is_alpha_required(&self) -> bool {
        self.alpha < 1.0
    }
}

/// One mesh instance attached to an entity.
#[derive(Debug, Clone)]
pub struct DrawableEntity {
    mesh: Rc<Mesh>,
    pub material: Material,
    pub transform: Transform,
}

impl DrawableEntity {
    pub fn new(mesh: Rc<Mesh>) -> Self {
        DrawableEntity {
            mesh,
            material: Material::default(),
            transform: Transform::default(),
        }
    }

    pub fn with_diffuse_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.set_diffuse_color(r, g, b);
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.material.shininess = shininess;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.set_alpha(alpha);
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.scale_by(Vec3::new(x, y, z));
        self
    }

    pub fn with_translation(mut self, offset: Vec3) -> Self {
        self.transform.translate(offset);
        self
    }

    pub fn set_diffuse_color(&mut self, r: f32, g: f32, b: f32) {
        self.material.diffuse = Vec3::new(r, g, b);
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.material.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn is_alpha_required(&self) -> bool {
        self.material.is_alpha_required()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    /// Builds the draw submission for this model placed under `parent`.
    pub fn draw_call(&self, parent: &Mat4) -> DrawCall<'_> {
        DrawCall {
            mesh: &self.mesh,
            material: &self.material,
            transform: *parent * self.model_matrix(),
        }
    }
}

/// Everything a backend needs to rasterize one model.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub transform: Mat4,
}

impl DrawCall<'_> {
    /// World-space origin of the model.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

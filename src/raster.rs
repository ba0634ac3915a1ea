//! Software rasterizer implementing `RenderBackend`.
//!
//! Triangles are transformed to clip space, clipped against the near plane,
//! projected and filled with edge functions. Shading is flat: one Phong-style
//! colour per triangle from the ambient colour, the active lights and the
//! material. The depth test is "less or equal" and depth writes can be
//! masked, matching what the transparent pass expects.

use crate::model::{DrawCall, Material};
use crate::render::{Light, RenderBackend, LIGHT_COUNT};
use glam::{Mat4, Vec3, Vec4};

/// Depth value of a cleared pixel (the far plane).
const FAR_DEPTH: f32 = 1.0;

/// Strength of the white specular highlight.
const SPECULAR_STRENGTH: f32 = 0.5;

/// Colour and depth buffers, row-major from the top-left corner.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    color: Vec<Vec3>,
    depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            color: vec![Vec3::ZERO; width * height],
            depth: vec![FAR_DEPTH; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Vec3) {
        self.color.fill(color);
        self.depth.fill(FAR_DEPTH);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Vec3> {
        self.index(x, y).map(|i| self.color[i])
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Packs the colour buffer as 8-bit RGB triples, ready for an SDL
    /// `RGB24` streaming texture with a pitch of `width * 3`.
    pub fn to_rgb24(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.color.len() * 3);
        for c in &self.color {
            let c = c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
            bytes.extend_from_slice(&[c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]);
        }
        bytes
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

/// Projected vertex: pixel coordinates plus depth in [0, 1].
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
}

/// Render state plus the framebuffer it draws into.
pub struct RasterBackend {
    framebuffer: Framebuffer,
    view: Mat4,
    projection: Mat4,
    camera_position: Vec3,
    lights: [Option<Light>; LIGHT_COUNT],
    ambient: Vec3,
    blending: bool,
    depth_write: bool,
}

impl RasterBackend {
    pub fn new(width: usize, height: usize) -> Self {
        RasterBackend {
            framebuffer: Framebuffer::new(width, height),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
            lights: [None; LIGHT_COUNT],
            ambient: Vec3::ZERO,
            blending: false,
            depth_write: true,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Flat Phong colour of a world-space triangle.
    ///
    /// The normal is flipped toward the camera so that both faces are lit.
    fn shade(&self, world: &[Vec3; 3], material: &Material) -> Vec3 {
        let center = (world[0] + world[1] + world[2]) / 3.0;
        let to_eye = (self.camera_position - center).normalize_or_zero();
        let mut normal = (world[1] - world[0]).cross(world[2] - world[0]).normalize_or_zero();
        if normal.dot(to_eye) < 0.0 {
            normal = -normal;
        }

        let mut color = self.ambient * material.diffuse;
        for light in self.lights.iter().flatten() {
            let to_light = (light.position - center).normalize_or_zero();
            let diffuse = normal.dot(to_light).max(0.0);
            let halfway = (to_light + to_eye).normalize_or_zero();
            let specular = if diffuse > 0.0 {
                normal.dot(halfway).max(0.0).powf(material.shininess.max(1.0)) * SPECULAR_STRENGTH
            } else {
                0.0
            };
            color += light.color * (material.diffuse * diffuse + Vec3::splat(specular));
        }
        color.clamp(Vec3::ZERO, Vec3::ONE)
    }

    fn to_screen(&self, clip: Vec4) -> ScreenVertex {
        let ndc = clip.truncate() / clip.w;
        ScreenVertex {
            x: (ndc.x + 1.0) * 0.5 * self.framebuffer.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.framebuffer.height as f32,
            depth: ndc.z * 0.5 + 0.5,
        }
    }

    fn fill_triangle(&mut self, v: [ScreenVertex; 3], color: Vec3, alpha: f32) {
        let fb = &mut self.framebuffer;
        let min_x = v[0].x.min(v[1].x).min(v[2].x).max(0.0) as usize;
        let max_x = (v[0].x.max(v[1].x).max(v[2].x) + 1.0).clamp(0.0, fb.width as f32) as usize;
        let min_y = v[0].y.min(v[1].y).min(v[2].y).max(0.0) as usize;
        let max_y = (v[0].y.max(v[1].y).max(v[2].y) + 1.0).clamp(0.0, fb.height as f32) as usize;
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        // Edge function: E(p) = (b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)
        let area = (v[1].y - v[2].y) * (v[0].x - v[2].x) + (v[2].x - v[1].x) * (v[0].y - v[2].y);
        if area.abs() < 1e-6 {
            return;
        }
        let inv_area = 1.0 / area;

        for y in min_y..max_y {
            let py = y as f32 + 0.5;
            for x in min_x..max_x {
                let px = x as f32 + 0.5;
                let w0 = ((v[1].y - v[2].y) * (px - v[2].x) + (v[2].x - v[1].x) * (py - v[2].y)) * inv_area;
                let w1 = ((v[2].y - v[0].y) * (px - v[2].x) + (v[0].x - v[2].x) * (py - v[2].y)) * inv_area;
                let w2 = 1.0 - w0 - w1;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                // NDC depth is affine in screen space, so plain barycentric
                // interpolation is exact here
                let depth = w0 * v[0].depth + w1 * v[1].depth + w2 * v[2].depth;
                let i = y * fb.width + x;
                if depth > fb.depth[i] {
                    continue;
                }
                if self.depth_write {
                    fb.depth[i] = depth;
                }
                fb.color[i] = if self.blending {
                    color * alpha + fb.color[i] * (1.0 - alpha)
                } else {
                    color
                };
            }
        }
    }
}

/// Clips a polygon against the near plane (`z >= -w` in clip space).
///
/// Sutherland-Hodgman against a single plane; the result is a convex polygon
/// with zero to four vertices for a triangle input.
fn clip_near(polygon: &[Vec4]) -> Vec<Vec4> {
    let distance = |p: Vec4| p.z + p.w;
    let mut out = Vec::with_capacity(polygon.len() + 1);

    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (d_current, d_next) = (distance(current), distance(next));

        if d_current >= 0.0 {
            out.push(current);
        }
        if (d_current >= 0.0) != (d_next >= 0.0) {
            let t = d_current / (d_current - d_next);
            out.push(current.lerp(next, t));
        }
    }
    out
}

impl RenderBackend for RasterBackend {
    fn clear(&mut self, color: Vec3) {
        self.framebuffer.clear(color);
    }

    fn set_camera_transform(&mut self, view: Mat4) {
        self.view = view;
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.camera_position = position;
    }

    fn set_lights(&mut self, lights: &[Option<Light>]) {
        self.lights = [None; LIGHT_COUNT];
        for (slot, light) in self.lights.iter_mut().zip(lights) {
            *slot = *light;
        }
    }

    fn set_ambient_color(&mut self, color: Vec3) {
        self.ambient = color;
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blending = enabled;
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.depth_write = enabled;
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        let clip_from_model = self.projection * self.view * call.transform;
        let alpha = call.material.alpha;

        for triangle in call.mesh.triangle_positions() {
            let world = triangle.map(|p| call.transform.transform_point3(p));
            let clip = triangle.map(|p| clip_from_model * p.extend(1.0));

            let polygon = clip_near(&clip);
            if polygon.len() < 3 {
                continue;
            }

            let color = self.shade(&world, call.material);
            let screen: Vec<ScreenVertex> = polygon.iter().map(|&p| self.to_screen(p)).collect();
            for k in 1..screen.len() - 1 {
                self.fill_triangle([screen[0], screen[k], screen[k + 1]], color, alpha);
            }
        }
    }
}

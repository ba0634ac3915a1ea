//! Triangle meshes used by drawable models.
//!
//! Asset files are out of scope, so the game builds its geometry
//! procedurally. Meshes are immutable once built and shared between models
//! with `Rc`.

use glam::Vec3;
use std::f32::consts::PI;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Counter-clockwise triangles indexing into `positions`.
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Axis-aligned cube centred on the origin with edge length 1.
    pub fn cube() -> Self {
        let h = 0.5;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let triangles = vec![
            // -Z
            [0, 2, 1],
            [0, 3, 2],
            // +Z
            [4, 5, 6],
            [4, 6, 7],
            // -X
            [0, 4, 7],
            [0, 7, 3],
            // +X
            [1, 2, 6],
            [1, 6, 5],
            // -Y
            [0, 1, 5],
            [0, 5, 4],
            // +Y
            [3, 7, 6],
            [3, 6, 2],
        ];
        Mesh { positions, triangles }
    }

    /// UV sphere of radius 1. `stacks` and `slices` are clamped to a usable
    /// minimum.
    pub fn uv_sphere(stacks: u32, slices: u32) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);

        let mut positions = Vec::with_capacity(((stacks + 1) * slices) as usize);
        for stack in 0..=stacks {
            let phi = PI * stack as f32 / stacks as f32;
            for slice in 0..slices {
                let theta = 2.0 * PI * slice as f32 / slices as f32;
                positions.push(Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                ));
            }
        }

        let mut triangles = Vec::with_capacity((stacks * slices * 2) as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                let next = (slice + 1) % slices;
                let a = stack * slices + slice;
                let b = stack * slices + next;
                let c = (stack + 1) * slices + slice;
                let d = (stack + 1) * slices + next;
                triangles.push([a, b, c]);
                triangles.push([b, d, c]);
            }
        }

        Mesh { positions, triangles }
    }

    /// Iterates triangles as vertex positions.
    pub fn triangle_positions(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles.iter().filter_map(|[a, b, c]| {
            Some([
                *self.positions.get(*a as usize)?,
                *self.positions.get(*b as usize)?,
                *self.positions.get(*c as usize)?,
            ])
        })
    }
}

/// Shared handles to every mesh the game uses.
///
/// Cloning is cheap; entities that spawn other entities keep a copy.
#[derive(Debug, Clone)]
pub struct MeshLibrary {
    pub cube: Rc<Mesh>,
    pub sphere: Rc<Mesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        MeshLibrary {
            cube: Rc::new(Mesh::cube()),
            sphere: Rc::new(Mesh::uv_sphere(8, 12)),
        }
    }
}

impl Default for MeshLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_is_closed_box() {
        let cube = Mesh::cube();
        assert_eq!(cube.positions.len(), 8);
        assert_eq!(cube.triangles.len(), 12);
        assert!(cube.positions.iter().all(|p| p.abs().max_element() <= 0.5));
    }

    #[test]
    fn test_sphere_vertices_on_unit_radius() {
        let sphere = Mesh::uv_sphere(6, 8);
        assert!(sphere
            .positions
            .iter()
            .all(|p| (p.length() - 1.0).abs() < 1e-5));
        assert_eq!(sphere.triangles.len(), 6 * 8 * 2);
    }

    #[test]
    fn test_triangle_indices_in_range() {
        let sphere = Mesh::uv_sphere(3, 3);
        assert_eq!(sphere.triangle_positions().count(), sphere.triangles.len());
    }
}

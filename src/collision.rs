/// Collision detection and resolution for the arena
///
/// This module has two layers:
///
/// - **Geometry**: pure functions for sphere and axis-aligned box tests, plus
///   `calculate_overlap` for push-apart responses.
/// - **Passes**: `check_collisions_self` and `check_collisions`, which walk
///   registries pair by pair, dispatch `on_collide` to both participants and
///   erase whoever asked to be deleted without ever touching a freed entity.
///
/// # Restart rule
///
/// Each pass is a nested loop over two cursors, `i` (outer) and `j` (inner).
/// After a colliding pair has reacted:
///
/// 1. If the second entity is flagged, it is erased first. `j` now indexes the
///    entity that slid into its slot.
/// 2. If the first entity is flagged, it is erased and the outer scan restarts
///    at the entity now occupying slot `i`, with a fresh inner scan. If slot
///    `i` is past the end, the pass is over.
/// 3. Otherwise, if only the second was erased, the inner scan re-examines
///    slot `j` instead of advancing past it.
///
/// Rules 2 and 3 together fix which pairs are re-evaluated after a deletion.
use crate::entity::{EntityKind, GameEntity, SpawnQueue};
use crate::registry::Registry;
use glam::Vec3;

/// Local collision volume of an entity, before placement in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl Shape {
    /// Places the shape at `position`, scaled by `scale`.
    ///
    /// Boxes stay axis-aligned; rotation is ignored.
    pub fn bounds_at(&self, position: Vec3, scale: Vec3) -> Bounds {
        match *self {
            Shape::Sphere { radius } => Bounds::Sphere {
                center: position,
                radius: radius * scale.abs().max_element(),
            },
            Shape::Box { half_extents } => {
                let half = half_extents * scale.abs();
                Bounds::Aabb(Aabb {
                    min: position - half,
                    max: position + half,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Closest point inside the box to `point`.
    pub fn clamp_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// World-space collision volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Sphere { center: Vec3, radius: f32 },
    Aabb(Aabb),
}

impl Bounds {
    /// Symmetric overlap test. Touching surfaces do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        match (self, other) {
            (Bounds::Sphere { center: a, radius: ra }, Bounds::Sphere { center: b, radius: rb }) => {
                let reach = ra + rb;
                a.distance_squared(*b) < reach * reach
            }
            (Bounds::Aabb(a), Bounds::Aabb(b)) => aabb_intersect(a, b),
            (Bounds::Sphere { center, radius }, Bounds::Aabb(aabb))
            | (Bounds::Aabb(aabb), Bounds::Sphere { center, radius }) => {
                sphere_aabb_intersect(*center, *radius, aabb)
            }
        }
    }

    /// Tightest axis-aligned box around the volume.
    pub fn aabb(&self) -> Aabb {
        match *self {
            Bounds::Sphere { center, radius } => Aabb {
                min: center - Vec3::splat(radius),
                max: center + Vec3::splat(radius),
            },
            Bounds::Aabb(aabb) => aabb,
        }
    }
}

/// Two boxes intersect when they overlap on all three axes.
pub fn aabb_intersect(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x
        && a.max.x > b.min.x
        && a.min.y < b.max.y
        && a.max.y > b.min.y
        && a.min.z < b.max.z
        && a.max.z > b.min.z
}

pub fn sphere_aabb_intersect(center: Vec3, radius: f32, aabb: &Aabb) -> bool {
    let closest = aabb.clamp_point(center);
    closest.distance_squared(center) < radius * radius
}

/// Per-axis penetration of `a` into `b`.
///
/// Positive when `a` sits on the low side of `b` (push `a` toward -axis),
/// negative when it sits on the high side. Only meaningful for intersecting
/// boxes.
pub fn calculate_overlap(a: &Aabb, b: &Aabb) -> Vec3 {
    let axis = |a_min: f32, a_max: f32, b_min: f32, b_max: f32| {
        if a_min <= b_min {
            a_max - b_min
        } else {
            a_min - b_max
        }
    };
    Vec3::new(
        axis(a.min.x, a.max.x, b.min.x, b.max.x),
        axis(a.min.y, a.max.y, b.min.y, b.max.y),
        axis(a.min.z, a.max.z, b.min.z, b.max.z),
    )
}

/// Smallest translation that moves `a` out of `b`, along a single axis.
pub fn separation(a: &Aabb, b: &Aabb) -> Vec3 {
    let overlap = calculate_overlap(a, b);
    let abs = overlap.abs();
    if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::new(-overlap.x, 0.0, 0.0)
    } else if abs.y <= abs.z {
        Vec3::new(0.0, -overlap.y, 0.0)
    } else {
        Vec3::new(0.0, 0.0, -overlap.z)
    }
}

/// Which kinds of entity can touch each other. Symmetric by construction.
pub fn collides_with(a: EntityKind, b: EntityKind) -> bool {
    use EntityKind::*;

    let either = |x: EntityKind, y: EntityKind| (a == x && b == y) || (a == y && b == x);

    // The player never trips over its own projectiles, projectiles fly
    // through explosions, and static or transient scenery does not
    // interact with its own kind.
    !(either(Wall, Wall)
        || either(Explosion, Explosion)
        || either(Player, Bullet)
        || either(Player, Grenade)
        || either(Bullet, Explosion)
        || either(Grenade, Explosion))
}

/// Runs the collision test for one pair and, on contact, lets both react.
fn resolve_pair(first: &mut dyn GameEntity, second: &mut dyn GameEntity, spawns: &mut SpawnQueue) -> bool {
    if !first.did_collide(&*second) {
        return false;
    }
    log::trace!("collision {:?} <-> {:?}", first.kind(), second.kind());
    first.on_collide(&*second, spawns);
    second.on_collide(&*first, spawns);
    true
}

/// Checks every unordered pair of a single registry once.
pub fn check_collisions_self(list: &mut Registry, spawns: &mut SpawnQueue) {
    let mut i = 0;
    'outer: while i < list.len() {
        let mut j = i + 1;
        while j < list.len() {
            let Some((first, second)) = list.pair_mut(i, j) else {
                break;
            };
            if !resolve_pair(first, second, spawns) {
                j += 1;
                continue;
            }

            let delete_i = first.to_delete();
            let delete_j = second.to_delete();

            if delete_j {
                list.erase(j);
            }
            if delete_i {
                match list.erase(i) {
                    Some(next) => {
                        i = next;
                        continue 'outer;
                    }
                    None => return,
                }
            }
            if !delete_j {
                j += 1;
            }
        }
        i += 1;
    }
}

/// Checks every pair across two different registries once.
///
/// # Panics
///
/// If both arguments are the same registry kind. Running a cross pass over a
/// registry and itself would handle every pair twice and break the erase
/// bookkeeping, so this is treated as a programming error.
pub fn check_collisions(list_a: &mut Registry, list_b: &mut Registry, spawns: &mut SpawnQueue) {
    assert_ne!(
        list_a.kind(),
        list_b.kind(),
        "cross-collision pass needs two distinct registries"
    );

    let mut i = 0;
    'outer: while i < list_a.len() {
        let mut j = 0;
        while j < list_b.len() {
            let (Some(first), Some(second)) = (list_a.get_mut(i), list_b.get_mut(j)) else {
                break;
            };
            if !resolve_pair(first, second, spawns) {
                j += 1;
                continue;
            }

            let delete_i = first.to_delete();
            let delete_j = second.to_delete();

            if delete_j {
                list_b.erase(j);
            }
            if delete_i {
                match list_a.erase(i) {
                    Some(next) => {
                        i = next;
                        continue 'outer;
                    }
                    None => return,
                }
            }
            if !delete_j {
                j += 1;
            }
        }
        i += 1;
    }
}

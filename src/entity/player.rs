use super::{Bullet, EntityCore, EntityKind, GameEntity, Grenade, SpawnQueue, UpdateContext};
use super::explosion::EXPLOSION_DAMAGE;
use crate::collision::{self, Shape};
use crate::config::PlayerConfig;
use crate::input::LogicalKey;
use crate::mesh::MeshLibrary;
use crate::registry::RegistryKind;
use glam::Vec3;

/// Height of the camera above the player's centre.
pub const EYE_HEIGHT: f32 = 0.6;
/// Upward tilt added to a grenade throw.
const THROW_LIFT: f32 = 0.3;

/// The first-person avatar.
///
/// Movement is relative to the player's yaw, which lives in the Y component
/// of its transform's rotation. The body has no model; the camera sits at
/// `eye_position()`.
pub struct Player {
    core: EntityCore,
    config: PlayerConfig,
    meshes: MeshLibrary,
    spawn_point: Vec3,
    health: f32,
    on_ground: bool,
}

impl Player {
    pub fn new(spawn_point: Vec3, config: &PlayerConfig, meshes: &MeshLibrary) -> Self {
        let core = EntityCore::new(
            spawn_point,
            Shape::Box {
                half_extents: Vec3::new(0.4, 0.9, 0.4),
            },
        );
        Player {
            core,
            config: config.clone(),
            meshes: meshes.clone(),
            spawn_point,
            health: config.max_health,
            on_ground: false,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn yaw_degrees(&self) -> f32 {
        self.core.transform.rotation_degrees.y
    }

    pub fn eye_position(&self) -> Vec3 {
        self.core.position() + Vec3::new(0.0, EYE_HEIGHT, 0.0)
    }

    /// Horizontal unit vector the player faces.
    pub fn facing(&self) -> Vec3 {
        let yaw = self.yaw_degrees().to_radians();
        Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
    }

    fn respawn(&mut self) {
        log::info!("player died, respawning at {}", self.spawn_point);
        self.core.transform.translation = self.spawn_point;
        self.core.velocity = Vec3::ZERO;
        self.health = self.config.max_health;
        self.on_ground = false;
    }

    fn walk_direction(&self, ctx: &UpdateContext<'_>) -> Vec3 {
        let forward = self.facing();
        let right = Vec3::new(-forward.z, 0.0, forward.x);

        let mut direction = Vec3::ZERO;
        if ctx.input.is_down(LogicalKey::W) {
            direction += forward;
        }
        if ctx.input.is_down(LogicalKey::S) {
            direction -= forward;
        }
        if ctx.input.is_down(LogicalKey::D) {
            direction += right;
        }
        if ctx.input.is_down(LogicalKey::A) {
            direction -= right;
        }
        direction.normalize_or_zero()
    }

    fn fire(&self, spawns: &mut SpawnQueue) {
        let forward = self.facing();
        let bullet = Bullet::new(
            self.eye_position() + forward * 0.6,
            forward,
            self.config.bullet_speed,
            self.config.bullet_lifetime_ticks,
            &self.meshes,
        );
        spawns.spawn(RegistryKind::Entities, Box::new(bullet));
    }

    fn throw_grenade(&self, spawns: &mut SpawnQueue) {
        let forward = self.facing();
        let grenade = Grenade::new(
            self.eye_position() + forward * 0.7,
            forward + Vec3::new(0.0, THROW_LIFT, 0.0),
            self.config.grenade_force,
            self.config.grenade_fuse_ticks,
            &self.meshes,
        );
        spawns.spawn(RegistryKind::Entities, Box::new(grenade));
    }

    fn push_out_of(&mut self, other: &dyn GameEntity) {
        let push = collision::separation(&self.bounds().aabb(), &other.bounds().aabb());
        self.core.transform.translate(push);
        if push.y > 0.0 {
            self.on_ground = true;
            self.core.velocity.y = self.core.velocity.y.max(0.0);
        } else if push.y < 0.0 {
            // Bumped a ceiling
            self.core.velocity.y = self.core.velocity.y.min(0.0);
        }
    }
}

impl GameEntity for Player {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let turn = self.config.turn_speed_degrees;
        if ctx.input.is_down(LogicalKey::Q) {
            self.core.transform.rotate(0.0, turn, 0.0);
        }
        if ctx.input.is_down(LogicalKey::E) {
            self.core.transform.rotate(0.0, -turn, 0.0);
        }

        if ctx.input.is_down(LogicalKey::Space) && self.on_ground {
            self.core.velocity.y = self.config.jump_speed;
        }
        self.core.velocity.y += ctx.gravity.y;
        self.on_ground = false;

        let step = self.walk_direction(ctx) * self.config.move_speed + Vec3::new(0.0, self.core.velocity.y, 0.0);
        self.core.transform.translate(step);

        if ctx.input.mouse_edge_left {
            self.fire(ctx.spawns);
        }
        if ctx.input.mouse_edge_right {
            self.throw_grenade(ctx.spawns);
        }
    }

    fn on_collide(&mut self, other: &dyn GameEntity, _spawns: &mut SpawnQueue) {
        match other.kind() {
            EntityKind::Wall | EntityKind::Player => self.push_out_of(other),
            EntityKind::Explosion => {
                self.health -= EXPLOSION_DAMAGE;
                log::debug!("player hit by explosion, health {}", self.health);
                if self.health <= 0.0 {
                    self.respawn();
                }
            }
            EntityKind::Bullet | EntityKind::Grenade => {}
        }
    }
}

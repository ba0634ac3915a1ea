//! Runtime core for arena3d, a small real-time 3D arena game.
//!
//! The interesting work happens once per tick inside the simulation core:
//!
//! - `registry`: ordered entity collections with safe in-pass erasure
//! - `collision`: pairwise detection and mutual reaction dispatch
//! - `game`: the `World`, the active `Scene` and the fixed-rate `FrameScheduler`
//! - `render`: two-phase drawing with depth-sorted transparency
//!
//! Everything else (window, input devices, meshes, config) is a collaborator
//! the core talks to through small structs and traits.

pub mod camera;
pub mod collision;
pub mod config;
pub mod entity;
pub mod game;
pub mod input;
pub mod input_system;
pub mod logging;
pub mod mesh;
pub mod model;
pub mod raster;
pub mod registry;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

pub use camera::Camera;
pub use config::{ConfigError, GameConfig};
pub use entity::{EntityKind, GameEntity, MAX_MODELS};
pub use game::{ArenaScene, FrameScheduler, Scene, TickReport, World};
pub use input::InputState;
pub use registry::{EntityId, Registry, RegistryKind};
pub use render::{render_frame, RenderBackend};

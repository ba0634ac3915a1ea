// Game module - the simulation core that runs once per tick
//
// This module contains:
// - world.rs: World struct owning the three registries, camera, lights and input
// - scene.rs: Scene trait and the arena level
// - scheduler.rs: FrameScheduler driving fixed-rate ticks

pub mod scene;
pub mod scheduler;
pub mod world;

// Re-export types for convenience
pub use scene::{ArenaScene, Scene};
pub use scheduler::{FrameScheduler, TickReport};
pub use world::World;

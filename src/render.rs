/// Depth-sorting render system for the 3D arena
///
/// Every frame is drawn in two phases against an abstract `RenderBackend`:
///
/// 1. **Opaque phase**: walk every registry, every entity, every filled model
///    slot. Opaque models are drawn straight away with depth writes on.
///    Translucent models are pushed onto a `TransparencyQueue` instead.
/// 2. **Transparent phase**: turn blending on and depth writes off (the depth
///    test stays on, so opaque geometry still hides what is behind it), then
///    draw the queued models farthest-first. Afterwards both switches are
///    restored.
///
/// # Draw order
///
/// Blending composites onto whatever is already in the colour buffer, so
/// overlapping translucent surfaces must arrive back to front. This is the
/// painter's algorithm keyed on squared distance from the camera.
///
/// # Rust Learning: BinaryHeap as a priority queue
///
/// `std::collections::BinaryHeap` is a max-heap: `pop()` always returns the
/// greatest element. Ordering entries by squared distance therefore yields
/// the farthest model first without sorting the whole list.
use crate::entity::GameEntity;
use crate::game::World;
use crate::model::DrawCall;
use crate::registry::Registry;
use glam::{Mat4, Vec3};
use ordered_float::OrderedFloat;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Number of light slots the world exposes to the backend.
pub const LIGHT_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Light { position, color }
    }
}

/// Everything the renderer needs from a graphics API.
///
/// The game only ever talks to this trait. `RasterBackend` implements it in
/// software; tests implement it with a recorder.
pub trait RenderBackend {
    /// Clears colour and depth.
    fn clear(&mut self, color: Vec3);

    /// World-to-view matrix.
    fn set_camera_transform(&mut self, view: Mat4);

    fn set_projection(&mut self, projection: Mat4);

    /// Eye position, used for specular highlights.
    fn set_camera_position(&mut self, position: Vec3);

    /// Empty slots are unlit.
    fn set_lights(&mut self, lights: &[Option<Light>]);

    fn set_ambient_color(&mut self, color: Vec3);

    /// SRC_ALPHA / ONE_MINUS_SRC_ALPHA blending on or off.
    fn set_blending(&mut self, enabled: bool);

    /// Depth-buffer writes on or off. Depth testing is unaffected.
    fn set_depth_write(&mut self, enabled: bool);

    fn draw(&mut self, call: &DrawCall<'_>);
}

/// One queued translucent model.
///
/// Ordered by squared camera distance first, then by insertion order (earlier
/// insertions compare greater) so equal distances pop first-in first-out.
struct QueuedDraw<'a> {
    distance_squared: OrderedFloat<f32>,
    order: Reverse<u64>,
    call: DrawCall<'a>,
}

impl QueuedDraw<'_> {
    fn key(&self) -> (OrderedFloat<f32>, Reverse<u64>) {
        (self.distance_squared, self.order)
    }
}

impl PartialEq for QueuedDraw<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueuedDraw<'_> {}

impl PartialOrd for QueuedDraw<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedDraw<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Max-heap of translucent draw calls, farthest from the camera on top.
///
/// Built fresh for every frame; the borrowed draw calls cannot outlive the
/// world they point into.
pub struct TransparencyQueue<'a> {
    camera_position: Vec3,
    heap: BinaryHeap<QueuedDraw<'a>>,
    pushed: u64,
}

impl<'a> TransparencyQueue<'a> {
    pub fn new(camera_position: Vec3) -> Self {
        TransparencyQueue {
            camera_position,
            heap: BinaryHeap::new(),
            pushed: 0,
        }
    }

    pub fn push(&mut self, call: DrawCall<'a>) {
        let distance_squared = OrderedFloat(call.position().distance_squared(self.camera_position));
        self.heap.push(QueuedDraw {
            distance_squared,
            order: Reverse(self.pushed),
            call,
        });
        self.pushed += 1;
    }

    /// Removes the farthest remaining draw call.
    pub fn pop(&mut self) -> Option<DrawCall<'a>> {
        self.heap.pop().map(|entry| entry.call)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// How many draw calls went into each phase of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub opaque: usize,
    pub transparent: usize,
}

/// Draws the opaque models of one registry and queues the translucent ones.
///
/// Returns the number of models drawn immediately.
pub fn draw_opaque_entities<'a, B>(registry: &'a Registry, backend: &mut B, queue: &mut TransparencyQueue<'a>) -> usize
where
    B: RenderBackend + ?Sized,
{
    let mut drawn = 0;
    for entity in registry.iter() {
        drawn += draw_entity(entity, backend, queue);
    }
    drawn
}

fn draw_entity<'a, B>(entity: &'a dyn GameEntity, backend: &mut B, queue: &mut TransparencyQueue<'a>) -> usize
where
    B: RenderBackend + ?Sized,
{
    let parent = entity.transform().matrix();
    let mut drawn = 0;

    // Rust Learning: flatten() on an iterator of Options skips the Nones,
    // which is exactly "every non-empty model slot"
    for model in entity.models().iter().flatten() {
        let call = model.draw_call(&parent);
        if model.is_alpha_required() {
            queue.push(call);
        } else {
            backend.draw(&call);
            drawn += 1;
        }
    }
    drawn
}

/// Renders one frame of `world` through `backend`.
pub fn render_frame<B>(world: &World, backend: &mut B) -> FrameStats
where
    B: RenderBackend + ?Sized,
{
    let camera = &world.camera;
    backend.clear(world.clear_color);
    backend.set_camera_transform(camera.view_matrix());
    backend.set_projection(camera.projection_matrix());
    backend.set_camera_position(camera.position);
    backend.set_lights(&world.lights);
    backend.set_ambient_color(world.ambient_color);

    // Phase 1: opaque models now, translucent ones into the heap
    let mut queue = TransparencyQueue::new(camera.position);
    let mut stats = FrameStats::default();
    for registry in world.registries() {
        stats.opaque += draw_opaque_entities(registry, backend, &mut queue);
    }

    // Phase 2: blend back to front without touching the depth buffer
    backend.set_blending(true);
    backend.set_depth_write(false);
    while let Some(call) = queue.pop() {
        backend.draw(&call);
        stats.transparent += 1;
    }
    backend.set_depth_write(true);
    backend.set_blending(false);

    stats
}

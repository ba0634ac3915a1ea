// Fixed-rate tick driver
//
// The scheduler owns the World and the active Scene and advances them one
// tick at a time. It never sleeps itself: the caller polls it with the
// current time and sleeps for `time_until_next` in between, so the same code
// runs under the SDL loop and under tests with a fake clock.

use super::{Scene, World};
use std::time::{Duration, Instant};

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Value of the frame counter after the tick.
    pub frame: u64,
    /// The world changed and should be drawn.
    pub redraw_requested: bool,
    pub level_ended: bool,
}

pub struct FrameScheduler {
    world: World,
    scene: Box<dyn Scene>,
    interval: Duration,
    next_deadline: Option<Instant>,
    level_end_reported: bool,
}

impl FrameScheduler {
    /// Takes ownership of `world` and `scene` and runs the scene's setup.
    pub fn new(mut world: World, mut scene: Box<dyn Scene>, interval: Duration) -> Self {
        scene.setup(&mut world);
        log::info!(
            "Scheduler ready: {} entities, tick every {:.1} ms",
            world.entity_count(),
            interval.as_secs_f64() * 1000.0
        );
        FrameScheduler {
            world,
            scene,
            interval,
            next_deadline: None,
            level_end_reported: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for the input handler between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Runs one tick, in this exact order:
    ///
    /// 1. bump the frame counter
    /// 2. update entities, walls, soft entities
    /// 3. self(entities), entities x walls, entities x soft, walls x soft
    /// 4. scene update, then the level-end check
    /// 5. clear the mouse edge flags
    /// 6. request a redraw
    pub fn tick(&mut self) -> TickReport {
        let world = &mut self.world;
        world.frame_count += 1;

        world.update_all();
        world.resolve_collisions();

        self.scene.update(world);
        let level_ended = self.scene.level_end(world);
        if level_ended && !self.level_end_reported {
            log::info!("Level complete at frame {}", world.frame_count);
            self.level_end_reported = true;
        }

        world.input.clear_edges();

        TickReport {
            frame: world.frame_count,
            redraw_requested: true,
            level_ended,
        }
    }

    /// Runs at most one tick if its deadline has passed.
    ///
    /// The first poll always ticks. Each tick sets the next deadline to its
    /// own start time plus the interval, so a slow tick pushes the schedule
    /// back instead of triggering a burst of catch-up ticks.
    pub fn poll(&mut self, now: Instant) -> Option<TickReport> {
        if let Some(deadline) = self.next_deadline {
            if now < deadline {
                return None;
            }
        }
        self.next_deadline = Some(now + self.interval);
        Some(self.tick())
    }

    /// How long the caller may sleep before the next tick is due.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }
}

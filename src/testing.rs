//! Scripted entities for exercising the registry and collision passes.
//!
//! A `Probe` collides with the probes named in its partner list and flags
//! itself for deletion when it touches one of the probes in its killer list.
//! Every check, reaction and drop lands in a shared `CallLog`, which lets
//! tests assert on exact call order and on use-after-erase.

use crate::collision::Shape;
use crate::entity::{EntityCore, EntityKind, GameEntity, SpawnQueue, UpdateContext};
use crate::registry::{Registry, RegistryKind};
use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Checked(String, String),
    Reacted(String, String),
    Updated(String),
    Dropped(String),
}

#[derive(Default)]
struct ProbeInfo {
    name: String,
    partners: Vec<String>,
}

#[derive(Default)]
struct LogInner {
    events: Vec<Event>,
    probes: Vec<ProbeInfo>,
}

/// Shared, single-threaded record of what the probes saw.
#[derive(Clone, Default)]
pub struct CallLog {
    inner: Rc<RefCell<LogInner>>,
}

impl CallLog {
    fn record(&self, event: Event) {
        self.inner.borrow_mut().events.push(event);
    }

    fn register(&self, name: &str) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.probes.push(ProbeInfo {
            name: name.to_string(),
            partners: Vec::new(),
        });
        inner.probes.len() - 1
    }

    fn set_partners(&self, tag: usize, partners: &[&str]) {
        if let Some(info) = self.inner.borrow_mut().probes.get_mut(tag) {
            info.partners = partners.iter().map(|p| p.to_string()).collect();
        }
    }

    fn tag_of(entity: &dyn GameEntity) -> usize {
        entity.transform().translation.x as usize
    }

    /// Name of the probe behind `entity`, if it is one of ours.
    pub fn name_of(&self, entity: &dyn GameEntity) -> Option<String> {
        self.inner
            .borrow()
            .probes
            .get(Self::tag_of(entity))
            .map(|info| info.name.clone())
    }

    fn lists_partner(&self, tag: usize, other: &str) -> bool {
        self.inner
            .borrow()
            .probes
            .get(tag)
            .is_some_and(|info| info.partners.iter().any(|p| p == other))
    }

    pub fn names(&self, registry: &Registry) -> Vec<String> {
        registry
            .iter()
            .map(|e| self.name_of(e).unwrap_or_default())
            .collect()
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.borrow().events.clone()
    }

    pub fn checks(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Checked(a, b) => Some((a, b)),
                _ => None,
            })
            .collect()
    }

    pub fn reactions(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Reacted(a, b) => Some((a, b)),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Updated(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn drops(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Dropped(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    /// Events that mention a probe after it was dropped.
    pub fn touched_after_drop(&self) -> Vec<Event> {
        let events = self.events();
        let mut dropped: Vec<String> = Vec::new();
        let mut offending = Vec::new();
        for event in events {
            let mentions = |name: &String| match &event {
                Event::Checked(a, b) | Event::Reacted(a, b) => a == name || b == name,
                Event::Updated(a) | Event::Dropped(a) => a == name,
            };
            if dropped.iter().any(mentions) {
                offending.push(event.clone());
            }
            if let Event::Dropped(name) = &event {
                dropped.push(name.clone());
            }
        }
        offending
    }
}

pub struct Probe {
    core: EntityCore,
    tag: usize,
    name: String,
    killers: Vec<String>,
    delete_on_update: bool,
    spawn_on_collide: bool,
    log: CallLog,
}

impl Probe {
    pub fn new(name: &str, log: &CallLog) -> Self {
        let tag = log.register(name);
        Probe {
            // The tag rides in the x coordinate so any `&dyn GameEntity` can
            // be mapped back to its probe.
            core: EntityCore::new(Vec3::new(tag as f32, 0.0, 0.0), Shape::Sphere { radius: 0.0 }),
            tag,
            name: name.to_string(),
            killers: Vec::new(),
            delete_on_update: false,
            spawn_on_collide: false,
            log: log.clone(),
        }
    }

    pub fn colliding_with(self, partners: &[&str]) -> Self {
        self.log.set_partners(self.tag, partners);
        self
    }

    pub fn deleted_by(mut self, killers: &[&str]) -> Self {
        self.killers = killers.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn deleted_on_update(mut self) -> Self {
        self.delete_on_update = true;
        self
    }

    pub fn spawning_on_collide(mut self) -> Self {
        self.spawn_on_collide = true;
        self
    }
}

impl GameEntity for Probe {
    fn kind(&self) -> EntityKind {
        EntityKind::Bullet
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.log.record(Event::Updated(self.name.clone()));
        if self.delete_on_update {
            self.set_delete();
        }
    }

    fn did_collide(&self, other: &dyn GameEntity) -> bool {
        let other_name = self.log.name_of(other).unwrap_or_default();
        self.log
            .record(Event::Checked(self.name.clone(), other_name.clone()));
        self.log.lists_partner(self.tag, &other_name)
            || self.log.lists_partner(CallLog::tag_of(other), &self.name)
    }

    fn on_collide(&mut self, other: &dyn GameEntity, spawns: &mut SpawnQueue) {
        let other_name = self.log.name_of(other).unwrap_or_default();
        self.log
            .record(Event::Reacted(self.name.clone(), other_name.clone()));
        if self.killers.contains(&other_name) {
            self.set_delete();
        }
        if self.spawn_on_collide {
            let child = Probe::new(&format!("{}-child", self.name), &self.log);
            spawns.spawn(RegistryKind::SoftEntities, Box::new(child));
        }
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.log.record(Event::Dropped(self.name.clone()));
    }
}

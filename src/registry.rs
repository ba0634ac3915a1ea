//! Ordered, owning collections of entities.
//!
//! The world keeps three registries: mobile entities, static walls and
//! transient soft entities. A registry exclusively owns its members; the
//! only way out is `erase`, which drops the entity and tells the caller which
//! index to look at next.

use crate::entity::{EntityKind, GameEntity, UpdateContext};
use std::fmt;

/// World-unique handle assigned when an entity is filed into a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    Entities,
    Walls,
    SoftEntities,
}

struct Slot {
    id: EntityId,
    entity: Box<dyn GameEntity>,
}

pub struct Registry {
    kind: RegistryKind,
    slots: Vec<Slot>,
}

impl Registry {
    pub fn new(kind: RegistryKind) -> Self {
        Registry {
            kind,
            slots: Vec::new(),
        }
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Appends an entity; it will be visited after every current member.
    pub fn push(&mut self, id: EntityId, entity: Box<dyn GameEntity>) {
        log::debug!("{:?}: added {} ({:?})", self.kind, id, entity.kind());
        self.slots.push(Slot { id, entity });
    }

    pub fn get(&self, index: usize) -> Option<&dyn GameEntity> {
        self.slots.get(index).map(|slot| slot.entity.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn GameEntity + 'static)> {
        self.slots.get_mut(index).map(|slot| slot.entity.as_mut())
    }

    pub fn id_at(&self, index: usize) -> Option<EntityId> {
        self.slots.get(index).map(|slot| slot.id)
    }

    pub fn position_of(&self, id: EntityId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position_of(id).is_some()
    }

    /// Mutable access to two distinct members at once, `i < j`.
    pub fn pair_mut(
        &mut self,
        i: usize,
        j: usize,
    ) -> Option<(&mut (dyn GameEntity + 'static), &mut (dyn GameEntity + 'static))> {
        if i >= j || j >= self.slots.len() {
            return None;
        }
        let (head, tail) = self.slots.split_at_mut(j);
        let first = head.get_mut(i)?;
        let second = tail.first_mut()?;
        Some((first.entity.as_mut(), second.entity.as_mut()))
    }

    /// Removes and drops the entity at `index`, keeping the order of the rest.
    ///
    /// Returns `Some(index)` when another entity has moved into the freed
    /// slot, or `None` when `index` is now past the end. An out-of-range
    /// `index` removes nothing and returns `None`.
    pub fn erase(&mut self, index: usize) -> Option<usize> {
        debug_assert!(index < self.slots.len(), "erase out of range: {index}");
        if index >= self.slots.len() {
            return None;
        }
        let slot = self.slots.remove(index);
        log::debug!("{:?}: erased {} ({:?})", self.kind, slot.id, slot.entity.kind());
        drop(slot);
        (index < self.slots.len()).then_some(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn GameEntity> + '_ {
        self.slots.iter().map(|slot| slot.entity.as_ref())
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.iter().filter(|e| e.kind() == kind).count()
    }

    /// First member of the given kind.
    pub fn find_kind(&self, kind: EntityKind) -> Option<&dyn GameEntity> {
        self.iter().find(|e| e.kind() == kind)
    }

    /// Runs `update` on every member in order.
    ///
    /// The delete flag is read after `update` returns, so an entity can
    /// retire itself during its own update. Retired entities are erased on
    /// the spot and never updated again.
    pub fn update_all(&mut self, ctx: &mut UpdateContext<'_>) {
        let mut i = 0;
        while let Some(entity) = self.get_mut(i) {
            entity.update(ctx);
            if entity.to_delete() {
                self.erase(i);
                continue;
            }
            i += 1;
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SpawnQueue;
    use crate::input::InputState;
    use crate::testing::{CallLog, Probe};
    use glam::Vec3;

    fn update(registry: &mut Registry) {
        let input = InputState::new();
        let mut spawns = SpawnQueue::new();
        let mut ctx = UpdateContext {
            input: &input,
            gravity: Vec3::ZERO,
            spawns: &mut spawns,
        };
        registry.update_all(&mut ctx);
    }

    #[test]
    fn test_erase_returns_next_position() {
        let log = CallLog::default();
        let mut registry = Registry::new(RegistryKind::Entities);
        for (n, name) in ["a", "b", "c"].iter().enumerate() {
            registry.push(EntityId(n as u64), Box::new(Probe::new(name, &log)));
        }

        assert_eq!(registry.erase(1), Some(1));
        assert_eq!(log.names(&registry), vec!["a", "c"]);
        assert_eq!(registry.erase(1), None);
        assert_eq!(log.names(&registry), vec!["a"]);
        assert_eq!(log.drops(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_pair_mut_requires_ordered_distinct_indices() {
        let log = CallLog::default();
        let mut registry = Registry::new(RegistryKind::Entities);
        registry.push(EntityId(0), Box::new(Probe::new("a", &log)));
        registry.push(EntityId(1), Box::new(Probe::new("b", &log)));

        assert!(registry.pair_mut(0, 1).is_some());
        assert!(registry.pair_mut(1, 1).is_none());
        assert!(registry.pair_mut(1, 0).is_none());
        assert!(registry.pair_mut(0, 2).is_none());
    }

    #[test]
    fn test_update_removes_self_deleting_entities_in_order() {
        let log = CallLog::default();
        let mut registry = Registry::new(RegistryKind::SoftEntities);
        registry.push(EntityId(0), Box::new(Probe::new("a", &log)));
        registry.push(EntityId(1), Box::new(Probe::new("b", &log).deleted_on_update()));
        registry.push(EntityId(2), Box::new(Probe::new("c", &log).deleted_on_update()));
        registry.push(EntityId(3), Box::new(Probe::new("d", &log)));

        update(&mut registry);

        assert_eq!(log.updates(), vec!["a", "b", "c", "d"]);
        assert_eq!(log.drops(), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(registry.ids(), vec![EntityId(0), EntityId(3)]);
        assert!(log.touched_after_drop().is_empty());
    }

    #[test]
    fn test_update_empty_registry() {
        let mut registry = Registry::new(RegistryKind::Walls);
        update(&mut registry);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_mut_reaches_member() {
        let log = CallLog::default();
        let mut registry = Registry::new(RegistryKind::Entities);
        registry.push(EntityId(0), Box::new(Probe::new("a", &log)));
        registry.push(EntityId(1), Box::new(Probe::new("b", &log)));

        if let Some(entity) = registry.get_mut(1) {
            entity.set_delete();
        }
        assert!(registry.get(1).is_some_and(|e| e.to_delete()));
        assert!(registry.get_mut(2).is_none());

        // A flag raised outside the pass is still honoured by the next update
        update(&mut registry);
        assert_eq!(log.names(&registry), vec!["a"]);
    }

    #[test]
    fn test_lookup_by_id() {
        let log = CallLog::default();
        let mut registry = Registry::new(RegistryKind::Entities);
        registry.push(EntityId(7), Box::new(Probe::new("a", &log)));
        registry.push(EntityId(9), Box::new(Probe::new("b", &log)));

        assert_eq!(registry.position_of(EntityId(9)), Some(1));
        assert!(registry.contains(EntityId(7)));
        assert!(!registry.contains(EntityId(8)));
        assert_eq!(registry.id_at(0), Some(EntityId(7)));
    }
}

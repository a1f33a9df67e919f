//! The editable charge collection and the immutable snapshots taken from it.
//!
//! A [`ChargeSet`] is owned and mutated by the scene (add, remove, drag). The
//! evaluator never sees it directly: callers take a [`Snapshot`] and evaluate
//! against that, so a charge being dragged cannot tear a field query.
//! UI handles live in a [`HandleMap`] keyed by [`ChargeId`], not on the
//! charge itself.

use crate::charge::{Charge, ChargeId};
use crate::error::FieldError;
use glam::DVec2;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered collection of charges with stable ids.
///
/// Insertion order is preserved. Duplicate positions are allowed.
#[derive(Debug, Clone, Default)]
pub struct ChargeSet {
    entries: Vec<(ChargeId, Charge)>,
    next_id: u64,
}

impl ChargeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from charges, assigning ids in iteration order.
    pub fn from_charges(charges: impl IntoIterator<Item = Charge>) -> Self {
        let mut set = Self::new();
        for charge in charges {
            set.add(charge);
        }
        set
    }

    /// Adds a charge and returns its new id.
    pub fn add(&mut self, charge: Charge) -> ChargeId {
        let id = ChargeId::from_raw(self.next_id);
        self.next_id += 1;
        self.entries.push((id, charge));
        log::debug!(
            "added charge {id} q={} at ({}, {})",
            charge.charge,
            charge.position.x,
            charge.position.y
        );
        id
    }

    /// Removes a charge, returning it.
    ///
    /// Returns `FieldError::ChargeNotFound` if `id` is not in the set.
    pub fn remove(&mut self, id: ChargeId) -> Result<Charge, FieldError> {
        let idx = self.index_of(id)?;
        let (_, charge) = self.entries.remove(idx);
        log::debug!("removed charge {id}");
        Ok(charge)
    }

    /// Moves a charge to a new position (drag update).
    pub fn move_to(&mut self, id: ChargeId, position: DVec2) -> Result<(), FieldError> {
        let idx = self.index_of(id)?;
        self.entries[idx].1.position = position;
        log::trace!("moved charge {id} to ({}, {})", position.x, position.y);
        Ok(())
    }

    /// Replaces a charge's magnitude.
    pub fn set_charge(&mut self, id: ChargeId, charge: f64) -> Result<(), FieldError> {
        let idx = self.index_of(id)?;
        self.entries[idx].1.charge = charge;
        log::debug!("set charge {id} to q={charge}");
        Ok(())
    }

    pub fn get(&self, id: ChargeId) -> Option<&Charge> {
        self.entries
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, c)| c)
    }

    pub fn contains(&self, id: ChargeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(id, charge)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ChargeId, &Charge)> + '_ {
        self.entries.iter().map(|(id, c)| (*id, c))
    }

    pub fn ids(&self) -> impl Iterator<Item = ChargeId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Finds the charge closest to `point` within `max_distance` display units.
    ///
    /// Ties go to the charge added first. Used for picking under the pointer.
    pub fn nearest(&self, point: DVec2, max_distance: f64) -> Option<ChargeId> {
        self.entries
            .iter()
            .map(|(id, c)| (*id, c.position.distance(point)))
            .filter(|(_, d)| *d <= max_distance)
            .fold(None, |best: Option<(ChargeId, f64)>, (id, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((id, d)),
            })
            .map(|(id, _)| id)
    }

    /// Takes an immutable copy of the current charges.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ids: self.entries.iter().map(|(id, _)| *id).collect(),
            charges: self.entries.iter().map(|(_, c)| *c).collect(),
        }
    }

    fn index_of(&self, id: ChargeId) -> Result<usize, FieldError> {
        self.entries
            .iter()
            .position(|(eid, _)| *eid == id)
            .ok_or(FieldError::ChargeNotFound(id))
    }
}

/// Immutable, cheaply clonable view of a [`ChargeSet`] at one instant.
///
/// Indices into [`Snapshot::charges`] line up with [`Snapshot::ids`], so an
/// index reported by the evaluator can be mapped back to a [`ChargeId`].
#[derive(Debug, Clone)]
pub struct Snapshot {
    ids: Arc<[ChargeId]>,
    charges: Arc<[Charge]>,
}

impl Snapshot {
    pub fn charges(&self) -> &[Charge] {
        &self.charges
    }

    pub fn ids(&self) -> &[ChargeId] {
        &self.ids
    }

    /// Id of the charge at snapshot index `index`.
    pub fn id_at(&self, index: usize) -> Option<ChargeId> {
        self.ids.get(index).copied()
    }

    /// Snapshot index of `id`, if it was present when the snapshot was taken.
    pub fn index_of(&self, id: ChargeId) -> Option<usize> {
        self.ids.iter().position(|&i| i == id)
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }
}

/// Side table mapping charges to UI-owned display handles.
#[derive(Debug, Clone)]
pub struct HandleMap<H> {
    handles: HashMap<ChargeId, H>,
}

impl<H> Default for HandleMap<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> HandleMap<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `handle` with `id`, returning any handle it replaced.
    pub fn bind(&mut self, id: ChargeId, handle: H) -> Option<H> {
        self.handles.insert(id, handle)
    }

    pub fn get(&self, id: ChargeId) -> Option<&H> {
        self.handles.get(&id)
    }

    /// Drops the association for `id`, handing the handle back to the caller.
    pub fn release(&mut self, id: ChargeId) -> Option<H> {
        self.handles.remove(&id)
    }

    /// Removes and returns handles whose charge no longer exists in `set`.
    pub fn retain_live(&mut self, set: &ChargeSet) -> Vec<H> {
        let stale: Vec<ChargeId> = self
            .handles
            .keys()
            .copied()
            .filter(|id| !set.contains(*id))
            .collect();
        stale
            .into_iter()
            .filter_map(|id| self.handles.remove(&id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

//! Advisory claim bookkeeping.
//!
//! The [`LockRegistry`] records which recipients currently reference each
//! room. It never blocks anything: a room may be claimed by any number of
//! recipients, and the store mutates claimed rooms freely. The registry
//! exists so the store can release and re-establish a selection's claims
//! around a mutation.

use atlas_core::{RecipientToken, RoomId};
use indexmap::{IndexMap, IndexSet};

/// Map from room to the set of recipients referencing it.
///
/// Rooms with no remaining holder have no entry.
#[derive(Clone, Debug, Default)]
pub struct LockRegistry {
    locks: IndexMap<RoomId, IndexSet<RecipientToken>>,
}

impl LockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `token` references `id`. Returns `true` if the claim is new.
    pub fn lock(&mut self, token: RecipientToken, id: RoomId) -> bool {
        self.locks.entry(id).or_default().insert(token)
    }

    /// Drop `token`'s claim on `id`. Returns `true` if there was one.
    pub fn unlock(&mut self, token: RecipientToken, id: RoomId) -> bool {
        let Some(holders) = self.locks.get_mut(&id) else {
            return false;
        };
        let removed = holders.shift_remove(&token);
        if holders.is_empty() {
            self.locks.shift_remove(&id);
        }
        removed
    }

    /// Drop every claim held by `token`. Returns how many were dropped.
    pub fn unlock_all(&mut self, token: RecipientToken) -> usize {
        let mut dropped = 0;
        self.locks.retain(|_, holders| {
            if holders.shift_remove(&token) {
                dropped += 1;
            }
            !holders.is_empty()
        });
        dropped
    }

    /// Recipients currently referencing `id`, in claim order.
    pub fn holders(&self, id: RoomId) -> impl Iterator<Item = RecipientToken> + '_ {
        self.locks.get(&id).into_iter().flatten().copied()
    }

    /// Whether any recipient references `id`.
    pub fn is_locked(&self, id: RoomId) -> bool {
        self.locks.contains_key(&id)
    }

    /// Whether `token` references `id`.
    pub fn is_locked_by(&self, id: RoomId, token: RecipientToken) -> bool {
        self.locks.get(&id).is_some_and(|h| h.contains(&token))
    }

    /// Rooms with at least one holder.
    pub fn rooms(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.locks.keys().copied()
    }

    /// Drop every claim on a room that no longer exists.
    pub fn forget_room(&mut self, id: RoomId) {
        self.locks.shift_remove(&id);
    }

    /// Number of rooms with at least one holder.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns `true` if no room is claimed.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Drop every claim.
    pub fn clear(&mut self) {
        self.locks.clear();
    }
}

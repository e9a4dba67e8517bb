//! Weak back-references between targeted generators and their targets.
//!
//! A [`TargetLink`] is the generator's side of the association; the
//! [`LinkRegistry`] keeps the target's side, keyed by the target's
//! [`EntityId`]. Both sides share one slot whose `live` flag is the single
//! point of invalidation: whichever side tears the link down first flips it,
//! and the other side observes the result lazily on its next access.
//!
//! The registry is owned by whoever owns entity lifecycle. Destroying a
//! target calls [`LinkRegistry::invalidate_target`] on that side's tick;
//! the generator notices on its next update without taking a lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::error::LinkError;
use crate::state::EntityId;

#[derive(Debug)]
struct LinkSlot {
    owner: EntityId,
    target: EntityId,
    live: AtomicBool,
}

impl LinkSlot {
    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Returns true if this call performed the invalidation.
    fn invalidate(&self) -> bool {
        self.live.swap(false, Ordering::AcqRel)
    }
}

/// Generator-side handle on a target. Dropping it unlinks.
#[derive(Debug)]
pub struct TargetLink {
    slot: Arc<LinkSlot>,
}

impl TargetLink {
    /// The linked target, or `None` once either side has torn the link down.
    pub fn target(&self) -> Option<EntityId> {
        self.slot.is_live().then_some(self.slot.target)
    }

    /// The target this link was created for, regardless of validity.
    pub fn target_id(&self) -> EntityId {
        self.slot.target
    }

    /// Entity holding the link.
    pub fn owner(&self) -> EntityId {
        self.slot.owner
    }

    /// Returns true until either side tears the link down.
    pub fn is_valid(&self) -> bool {
        self.slot.is_live()
    }

    /// Tears the link down from the generator side.
    pub fn unlink(&self) {
        if self.slot.invalidate() {
            tracing::trace!(owner = %self.slot.owner, target = %self.slot.target, "target link released");
        }
    }
}

impl Drop for TargetLink {
    fn drop(&mut self) {
        self.unlink();
    }
}

/// Target-side bookkeeping: which links point at which target.
///
/// Entries are weak; links dropped by their generators disappear from the
/// registry on the next [`LinkRegistry::link`] or
/// [`LinkRegistry::invalidate_target`] for their target. Nothing else compacts
/// the map: embedders whose generators end without their targets being
/// destroyed should call [`LinkRegistry::prune`] periodically, e.g. once per
/// world update.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    followers: HashMap<EntityId, Vec<Weak<LinkSlot>>>,
}

impl LinkRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `owner` to `target` and returns the generator-side handle.
    pub fn link(&mut self, owner: EntityId, target: EntityId) -> Result<TargetLink, LinkError> {
        if owner == target {
            return Err(LinkError::SelfLink(owner));
        }

        let slot = Arc::new(LinkSlot {
            owner,
            target,
            live: AtomicBool::new(true),
        });

        let entries = self.followers.entry(target).or_default();
        entries.retain(|weak| weak.upgrade().is_some_and(|slot| slot.is_live()));
        entries.push(Arc::downgrade(&slot));

        tracing::trace!(owner = %owner, target = %target, "target link established");
        Ok(TargetLink { slot })
    }

    /// Invalidates every link pointing at `target`, typically because the
    /// target is being destroyed. Returns the number of links this call
    /// invalidated.
    pub fn invalidate_target(&mut self, target: EntityId) -> usize {
        let Some(entries) = self.followers.remove(&target) else {
            return 0;
        };

        let invalidated = entries
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|slot| slot.invalidate())
            .count();

        if invalidated > 0 {
            tracing::debug!(target = %target, invalidated, "target destroyed, links invalidated");
        }
        invalidated
    }

    /// Owners currently holding a live link to `target`.
    pub fn followers(&self, target: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.followers
            .get(&target)
            .into_iter()
            .flatten()
            .filter_map(Weak::upgrade)
            .filter(|slot| slot.is_live())
            .map(|slot| slot.owner)
    }

    /// Number of live links to `target`. Dead entries are skipped, not removed.
    pub fn follower_count(&self, target: EntityId) -> usize {
        self.followers(target).count()
    }

    /// Drops registry entries whose links are gone, across every target.
    pub fn prune(&mut self) {
        self.followers.retain(|_, entries| {
            entries.retain(|weak| weak.upgrade().is_some_and(|slot| slot.is_live()));
            !entries.is_empty()
        });
    }

    /// Number of targets with at least one registry entry (live or not yet pruned).
    pub fn tracked_targets(&self) -> usize {
        self.followers.len()
    }
}

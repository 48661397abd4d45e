//! Last-author tracking for a single document.
//!
//! [`RangeOwnershipTracker`] keeps the authorship partition: owner-tagged,
//! non-overlapping spans over the document. It is moved along with the text by
//! [`RangeOwnershipTracker::apply_document_change`] and rewritten by
//! [`RangeOwnershipTracker::apply_ownership_claim`].
//!
//! A claim only looks at intervals that overlap or touch `[from, to)`; the
//! interval index answers that query without walking the whole partition.

use crate::config::{ClaimPolicy, TrackerSettings};
use crate::error::{AuthorshipError, AuthorshipResult};
use crate::interval::{AuthorshipInterval, OwnerId};
use crate::remap::{Assoc, EditBatch, PositionRemap};
use log::{debug, trace, warn};
use rust_lapper::{Interval, Lapper};
use std::fmt;

type Entry = Interval<usize, OwnerId>;

/// How a claim treats one existing interval it overlaps or touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClaimDecision {
    /// Adjacent to the claim at a single point.
    Touching,
    /// Already authored by the claiming owner.
    SameOwner,
    /// Different owner with a boundary flush against the claim's.
    FlushBoundary,
    /// Different owner overlapping the claim; split around it.
    Split,
}

impl ClaimDecision {
    pub(crate) fn classify(
        existing: &AuthorshipInterval,
        from: usize,
        to: usize,
        owner: &OwnerId,
    ) -> Self {
        if existing.start == to || existing.end == from {
            ClaimDecision::Touching
        } else if existing.owner.is_defined() && existing.owner == *owner {
            ClaimDecision::SameOwner
        } else if existing.start == from || existing.end == to {
            ClaimDecision::FlushBoundary
        } else {
            ClaimDecision::Split
        }
    }
}

/// Intervals to drop and to add for one claim.
#[derive(Debug, Default)]
struct ClaimPlan {
    removed: Vec<AuthorshipInterval>,
    added: Vec<AuthorshipInterval>,
}

impl ClaimPlan {
    /// Drop `existing` and keep whatever part of it lies outside `[from, to)`.
    fn split_around(&mut self, existing: AuthorshipInterval, from: usize, to: usize) {
        if existing.start < from {
            self.added.push(AuthorshipInterval::new(
                existing.start,
                from,
                existing.owner.clone(),
            ));
        }
        if to < existing.end {
            self.added.push(AuthorshipInterval::new(
                to,
                existing.end,
                existing.owner.clone(),
            ));
        }
        self.removed.push(existing);
    }

    fn add_unique(&mut self, interval: AuthorshipInterval) {
        if !self.added.contains(&interval) {
            self.added.push(interval);
        }
    }
}

fn to_interval(entry: &Entry) -> AuthorshipInterval {
    AuthorshipInterval::new(entry.start, entry.stop, entry.val.clone())
}

fn to_entry(interval: AuthorshipInterval) -> Entry {
    Interval {
        start: interval.start,
        stop: interval.end,
        val: interval.owner,
    }
}

fn same_span(entry: &Entry, interval: &AuthorshipInterval) -> bool {
    entry.start == interval.start && entry.stop == interval.end && entry.val == interval.owner
}

/// Tracks which collaborator last wrote each span of one document.
pub struct RangeOwnershipTracker {
    index: Lapper<usize, OwnerId>,
    settings: TrackerSettings,
}

impl RangeOwnershipTracker {
    /// Create an empty tracker with default settings.
    pub fn new() -> Self {
        Self::with_settings(TrackerSettings::default())
    }

    pub fn with_settings(settings: TrackerSettings) -> Self {
        Self {
            index: Lapper::new(Vec::new()),
            settings,
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Move every interval along with a document edit.
    ///
    /// Starts and ends are remapped independently. Intervals whose span was
    /// deleted (start >= end afterwards) are dropped.
    pub fn apply_document_change<R>(&mut self, delta: &R)
    where
        R: PositionRemap + ?Sized,
    {
        if self.index.is_empty() {
            return;
        }

        let before = self.index.len();
        let remapped: Vec<Entry> = self
            .index
            .iter()
            .filter_map(|entry| {
                let start = delta.remap(entry.start, Assoc::After);
                let stop = delta.remap(entry.stop, Assoc::Before);
                (start < stop).then(|| Interval {
                    start,
                    stop,
                    val: entry.val.clone(),
                })
            })
            .collect();

        let dropped = before - remapped.len();
        self.index = Lapper::new(remapped);

        debug!(
            target: "authorship::tracker",
            "Remapped {} intervals, dropped {} collapsed",
            before,
            dropped
        );
        self.verify("document change");
    }

    /// Remap through the edits that turn `old_text` into `new_text`.
    ///
    /// # Fast path
    /// If old_text == new_text, returns immediately without any processing.
    pub fn apply_text_change(&mut self, old_text: &str, new_text: &str) {
        if old_text == new_text {
            return;
        }
        let batch = EditBatch::from_texts(old_text, new_text);
        self.apply_document_change(&batch);
    }

    /// Record that `owner` most recently wrote `[from, to)`.
    ///
    /// Rejects empty spans and undefined owners without touching the
    /// partition.
    pub fn apply_ownership_claim(
        &mut self,
        from: usize,
        to: usize,
        owner: impl Into<OwnerId>,
    ) -> AuthorshipResult<()> {
        let owner = owner.into();
        Self::validate_claim(from, to, &owner)?;

        let plan = match self.settings.claim_policy {
            ClaimPolicy::Replace => self.plan_replace(from, to, &owner),
            ClaimPolicy::Compatible => self.plan_compatible(from, to, &owner),
        };

        debug!(
            target: "authorship::tracker",
            "Claim [{}, {}) by {}: removed {}, added {}",
            from,
            to,
            owner,
            plan.removed.len(),
            plan.added.len()
        );
        self.commit(plan);
        self.verify("ownership claim");
        Ok(())
    }

    /// Reject empty spans and undefined owners.
    pub(crate) fn validate_claim(from: usize, to: usize, owner: &OwnerId) -> AuthorshipResult<()> {
        if from < to && owner.is_defined() {
            return Ok(());
        }
        warn!(
            target: "authorship::tracker",
            "Rejected ownership claim [{}, {}) for owner {:?}",
            from,
            to,
            owner.as_str()
        );
        Err(AuthorshipError::invalid_claim(from, to, owner.as_str()))
    }

    /// Intervals overlapping or touching `[from, to)`.
    fn claim_candidates(&self, from: usize, to: usize) -> Vec<AuthorshipInterval> {
        // Widen by one on each side so that touching neighbours are visited too
        self.index
            .find(from.saturating_sub(1), to.saturating_add(1))
            .map(to_interval)
            .collect()
    }

    fn plan_compatible(&self, from: usize, to: usize, owner: &OwnerId) -> ClaimPlan {
        let mut plan = ClaimPlan::default();
        let candidates = self.claim_candidates(from, to);
        let claim = AuthorshipInterval::new(from, to, owner.clone());
        let already_stored = candidates.contains(&claim);

        for existing in candidates {
            let decision = ClaimDecision::classify(&existing, from, to, owner);
            trace!(
                target: "authorship::tracker",
                "[{}, {}) by {}: {:?}",
                existing.start,
                existing.end,
                existing.owner,
                decision
            );
            if decision == ClaimDecision::Split {
                plan.split_around(existing, from, to);
            }
        }

        // A split materializes the claim as its middle piece; without a split
        // the claim is inserted on its own. Either way it lands exactly once.
        if !already_stored {
            plan.add_unique(claim);
        }
        plan
    }

    fn plan_replace(&self, from: usize, to: usize, owner: &OwnerId) -> ClaimPlan {
        let mut plan = ClaimPlan::default();
        let mut covered: Vec<(usize, usize)> = Vec::new();

        for existing in self.claim_candidates(from, to) {
            let decision = ClaimDecision::classify(&existing, from, to, owner);
            trace!(
                target: "authorship::tracker",
                "[{}, {}) by {}: {:?}",
                existing.start,
                existing.end,
                existing.owner,
                decision
            );
            match decision {
                ClaimDecision::Touching => {}
                ClaimDecision::SameOwner => {
                    covered.push((existing.start.max(from), existing.end.min(to)));
                }
                ClaimDecision::FlushBoundary | ClaimDecision::Split => {
                    plan.split_around(existing, from, to);
                }
            }
        }

        // The claim fills whatever the same owner does not already hold
        covered.sort_unstable();
        let mut cursor = from;
        for (start, end) in covered {
            if start > cursor {
                plan.add_unique(AuthorshipInterval::new(cursor, start, owner.clone()));
            }
            cursor = cursor.max(end);
        }
        if cursor < to {
            plan.add_unique(AuthorshipInterval::new(cursor, to, owner.clone()));
        }
        plan
    }

    /// Apply a plan. The index is immutable once built, so any change
    /// rebuilds it from the surviving intervals.
    fn commit(&mut self, plan: ClaimPlan) {
        if plan.removed.is_empty() && plan.added.is_empty() {
            return;
        }

        let mut entries: Vec<Entry> = self
            .index
            .iter()
            .filter(|entry| !plan.removed.iter().any(|r| same_span(entry, r)))
            .cloned()
            .collect();
        entries.extend(plan.added.into_iter().map(to_entry));
        self.index = Lapper::new(entries);
    }

    fn verify(&self, operation: &str) {
        if !self.settings.verify_invariants {
            return;
        }
        if let Err(e) = self.check_invariants() {
            warn!(
                target: "authorship::tracker",
                "Consistency check failed after {}: {}",
                operation,
                e
            );
        }
    }

    /// Check that every interval is non-empty and no two intervals overlap.
    pub fn check_invariants(&self) -> AuthorshipResult<()> {
        let snapshot = self.snapshot();
        let mut furthest: Option<&AuthorshipInterval> = None;

        for interval in &snapshot {
            if interval.is_empty() {
                return Err(AuthorshipError::invariant(format!(
                    "empty interval [{}, {}) for {}",
                    interval.start, interval.end, interval.owner
                )));
            }
            if let Some(previous) = furthest {
                if previous.overlaps(interval) {
                    return Err(AuthorshipError::invariant(format!(
                        "[{}, {}) by {} overlaps [{}, {}) by {}",
                        previous.start,
                        previous.end,
                        previous.owner,
                        interval.start,
                        interval.end,
                        interval.owner
                    )));
                }
            }
            if furthest.is_none_or(|previous| interval.end > previous.end) {
                furthest = Some(interval);
            }
        }
        Ok(())
    }

    /// The current partition, ordered by position.
    pub fn snapshot(&self) -> Vec<AuthorshipInterval> {
        let mut intervals: Vec<_> = self.index.iter().map(to_interval).collect();
        intervals.sort();
        intervals
    }

    /// Stored intervals in index order (by start, then end).
    pub fn iter(&self) -> impl Iterator<Item = AuthorshipInterval> + '_ {
        self.index.iter().map(to_interval)
    }

    /// Owner of the interval containing `pos`, if any.
    pub fn owner_at(&self, pos: usize) -> Option<&OwnerId> {
        self.index
            .find(pos, pos.saturating_add(1))
            .find(|entry| to_interval(entry).contains(pos))
            .map(|entry| &entry.val)
    }

    /// Intervals sharing at least one position with `[from, to)`.
    pub fn intervals_in(&self, from: usize, to: usize) -> Vec<AuthorshipInterval> {
        if from >= to {
            return Vec::new();
        }
        let mut intervals: Vec<_> = self.index.find(from, to).map(to_interval).collect();
        intervals.sort();
        intervals
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Forget all authorship information.
    pub fn clear(&mut self) {
        self.index = Lapper::new(Vec::new());
    }
}

impl Default for RangeOwnershipTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RangeOwnershipTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeOwnershipTracker")
            .field("settings", &self.settings)
            .field("intervals", &self.snapshot())
            .finish()
    }
}

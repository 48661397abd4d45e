//! Replaying recorded edit and claim events.
//!
//! A replay log is JSON lines, one event per line:
//!
//! ```text
//! {"type":"claim","from":0,"to":10,"owner":"alice"}
//! {"type":"edit","start":2,"old_end":8,"new_end":2}
//! {"type":"text","old":"hello","new":"hello!"}
//! ```
//!
//! Events are applied strictly in order, so claims are always expressed in
//! the coordinates left by the edits before them.

use crate::error::{AuthorshipError, AuthorshipResult};
use crate::remap::TextEdit;
use crate::tracker::RangeOwnershipTracker;
use log::warn;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// A single replace operation on the document.
    Edit {
        start: usize,
        old_end: usize,
        new_end: usize,
    },
    /// A document change given as its old and new contents.
    Text { old: String, new: String },
    /// `owner` wrote `[from, to)`.
    Claim {
        from: usize,
        to: usize,
        owner: String,
    },
}

/// Counts of what a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub edits: usize,
    pub claims: usize,
    pub rejected: usize,
}

/// Parse a JSON-lines event log. Blank lines are skipped.
pub fn parse_events(reader: impl BufRead) -> AuthorshipResult<Vec<ReplayEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line)
            .map_err(|e| AuthorshipError::replay(index + 1, e.to_string()))?;
        events.push(event);
    }
    Ok(events)
}

/// Apply one event. Rejected claims are reported as errors and leave the
/// partition untouched.
pub fn apply_event(tracker: &mut RangeOwnershipTracker, event: &ReplayEvent) -> AuthorshipResult<()> {
    match event {
        ReplayEvent::Edit {
            start,
            old_end,
            new_end,
        } => {
            tracker.apply_document_change(&TextEdit::new(*start, *old_end, *new_end));
            Ok(())
        }
        ReplayEvent::Text { old, new } => {
            tracker.apply_text_change(old, new);
            Ok(())
        }
        ReplayEvent::Claim { from, to, owner } => {
            tracker.apply_ownership_claim(*from, *to, owner.as_str())
        }
    }
}

/// Apply every event in order. Rejected claims are logged and skipped.
pub fn replay<'a>(
    tracker: &mut RangeOwnershipTracker,
    events: impl IntoIterator<Item = &'a ReplayEvent>,
) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for event in events {
        match (event, apply_event(tracker, event)) {
            (ReplayEvent::Claim { .. }, Ok(())) => stats.claims += 1,
            (_, Ok(())) => stats.edits += 1,
            (_, Err(e)) => {
                warn!(target: "authorship::replay", "Skipping event: {}", e);
                stats.rejected += 1;
            }
        }
    }
    stats
}

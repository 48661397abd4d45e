//! One authorship tracker per open document.

use crate::config::TrackerSettings;
use crate::error::AuthorshipResult;
use crate::interval::{AuthorshipInterval, OwnerId};
use crate::remap::PositionRemap;
use crate::tracker::RangeOwnershipTracker;
use dashmap::DashMap;
use log::debug;
use url::Url;

/// Authorship state for every open document, keyed by URI.
///
/// Trackers never share state; each document is reconciled independently.
pub struct AuthorshipRegistry {
    documents: DashMap<Url, RangeOwnershipTracker>,
    settings: TrackerSettings,
}

impl AuthorshipRegistry {
    pub fn new() -> Self {
        Self::with_settings(TrackerSettings::default())
    }

    pub fn with_settings(settings: TrackerSettings) -> Self {
        Self {
            documents: DashMap::new(),
            settings,
        }
    }

    /// Start tracking a document. Reopening keeps the existing state.
    pub fn open(&self, uri: &Url) {
        self.documents
            .entry(uri.clone())
            .or_insert_with(|| RangeOwnershipTracker::with_settings(self.settings.clone()));
    }

    /// Remove all tracked authorship for a document.
    ///
    /// Called on didClose to prevent memory leaks.
    pub fn close(&self, uri: &Url) {
        if self.documents.remove(uri).is_some() {
            debug!(target: "authorship::registry", "Closed {}", uri);
        }
    }

    pub fn is_open(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Remap a document's intervals. Unknown documents are ignored.
    pub fn apply_document_change<R>(&self, uri: &Url, delta: &R)
    where
        R: PositionRemap + ?Sized,
    {
        if let Some(mut tracker) = self.documents.get_mut(uri) {
            tracker.apply_document_change(delta);
        }
    }

    /// Remap a document's intervals through the diff between two versions.
    pub fn apply_text_change(&self, uri: &Url, old_text: &str, new_text: &str) {
        if let Some(mut tracker) = self.documents.get_mut(uri) {
            tracker.apply_text_change(old_text, new_text);
        }
    }

    /// Record a claim, opening the document if it is not tracked yet.
    ///
    /// A rejected claim leaves the registry untouched.
    pub fn apply_ownership_claim(
        &self,
        uri: &Url,
        from: usize,
        to: usize,
        owner: impl Into<OwnerId>,
    ) -> AuthorshipResult<()> {
        let owner = owner.into();
        RangeOwnershipTracker::validate_claim(from, to, &owner)?;

        let mut tracker = self
            .documents
            .entry(uri.clone())
            .or_insert_with(|| RangeOwnershipTracker::with_settings(self.settings.clone()));
        tracker.apply_ownership_claim(from, to, owner)
    }

    /// Current partition of a document; `None` if it is not open.
    pub fn snapshot(&self, uri: &Url) -> Option<Vec<AuthorshipInterval>> {
        self.documents.get(uri).map(|tracker| tracker.snapshot())
    }
}

impl Default for AuthorshipRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Consumption of structural mutation batches.

use chrono::{DateTime, Utc};
use log::debug;

use crate::{apply, ApplyOutcome, PostElement, Settings};

/// Posts found in one batch of inserted nodes: the inserted nodes themselves
/// when they are posts, plus their post descendants.
#[derive(Debug, Clone)]
pub struct MutationBatch<P> {
    posts: Vec<P>,
}

impl<P> Default for MutationBatch<P> {
    fn default() -> Self {
        Self { posts: Vec::new() }
    }
}

impl<P> MutationBatch<P> {
    pub fn new(posts: Vec<P>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[P] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl<P> FromIterator<P> for MutationBatch<P> {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub marked: usize,
    /// Posts in the batch left as they were (no timestamp, already marked, or styling disabled).
    pub skipped: usize,
    /// Caller should arm the one-shot full rescan.
    pub schedule_rescan: bool,
}

/// Tracks the bounded fallback rescan. At most one rescan is pending at a time.
#[derive(Debug, Default)]
pub struct Watcher {
    rescan_pending: bool,
}

impl Watcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rescan_pending(&self) -> bool {
        self.rescan_pending
    }

    /// Applies styling to the posts of an inserted subtree only.
    ///
    /// The rescan is armed while anything is on screen to maintain: painted
    /// posts or a visible legend.
    pub fn on_batch<P: PostElement>(
        &mut self,
        batch: &MutationBatch<P>,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for post in batch.posts() {
            match apply(post, settings, now) {
                ApplyOutcome::Marked(_) => outcome.marked += 1,
                _ => outcome.skipped += 1,
            }
        }

        let maintained = settings.styling_enabled() || settings.legend_visible();
        if !batch.is_empty() && maintained && !self.rescan_pending {
            self.rescan_pending = true;
            outcome.schedule_rescan = true;
        }

        debug!(
            "mutation batch: {} posts, {} marked",
            batch.len(),
            outcome.marked
        );
        outcome
    }

    /// Runs the fallback rescan over the full-document query and re-arms the watcher.
    pub fn on_rescan<'a, P, I>(&mut self, posts: I, settings: &Settings, now: DateTime<Utc>) -> usize
    where
        P: PostElement + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        self.rescan_pending = false;
        posts
            .into_iter()
            .filter(|post| apply(*post, settings, now).is_marked())
            .count()
    }
}

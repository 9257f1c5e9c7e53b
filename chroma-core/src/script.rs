//! Single owner of the runtime state: current settings, rescan tracking and the legend.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde_json::Value;

use crate::{
    reconcile, Ack, BatchOutcome, InboundMessage, Legend, LegendView, MutationBatch, PostElement,
    PostSource, ReconcileReport, Settings, Watcher,
};

pub struct ContentScript<V> {
    settings: Settings,
    watcher: Watcher,
    legend: Legend<V>,
}

impl<V: LegendView> ContentScript<V> {
    /// Starts with default settings; nothing is painted until the first `apply_settings`.
    pub fn new(view: V) -> Self {
        Self {
            settings: Settings::default(),
            watcher: Watcher::new(),
            legend: Legend::new(view),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn legend(&self) -> &Legend<V> {
        &self.legend
    }

    pub fn watcher(&self) -> &Watcher {
        &self.watcher
    }

    /// Replaces the settings wholesale, then reconciles every post and the legend.
    pub fn apply_settings<D: PostSource>(
        &mut self,
        settings: Settings,
        document: &D,
        now: DateTime<Utc>,
    ) -> ReconcileReport {
        self.settings = settings;

        let posts = document.posts();
        let report = reconcile(&posts, &self.settings, now);
        self.legend.sync(&self.settings);

        info!(
            "applied settings mode={} legend={} remove_css={}: {} marked, {} cleared, {} skipped",
            self.settings.color_mode.as_str(),
            self.settings.show_legend,
            self.settings.remove_css,
            report.marked,
            report.removed,
            report.skipped
        );
        report
    }

    /// Handles a runtime message. The returned ack, if any, must be sent back
    /// to the caller; it is produced only after reconciliation finished.
    pub fn handle_message<D: PostSource>(
        &mut self,
        message: &Value,
        document: &D,
        now: DateTime<Utc>,
    ) -> Option<Ack> {
        match InboundMessage::parse(message) {
            InboundMessage::UpdateSettings(Some(settings)) => {
                self.apply_settings(settings, document, now);
                Some(Ack::ok())
            }
            InboundMessage::UpdateSettings(None) => {
                warn!("settings update without a usable payload, ignoring");
                Some(Ack::ok())
            }
            InboundMessage::Ignored => None,
        }
    }

    pub fn on_batch<P: PostElement>(
        &mut self,
        batch: &MutationBatch<P>,
        now: DateTime<Utc>,
    ) -> BatchOutcome {
        self.watcher.on_batch(batch, &self.settings, now)
    }

    /// Full-document fallback rescan. Also puts back a legend the page removed.
    pub fn on_rescan<D: PostSource>(&mut self, document: &D, now: DateTime<Utc>) -> usize {
        let posts = document.posts();
        let marked = self.watcher.on_rescan(&posts, &self.settings, now);
        self.legend.restore_if_detached(&self.settings);
        marked
    }

    pub fn toggle_legend(&mut self) -> bool {
        self.legend.toggle()
    }
}

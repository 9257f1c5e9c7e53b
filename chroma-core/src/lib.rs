//! Core logic for age-coloring posts: classifier, settings, styling reconciliation and legend state.
//!
//! Everything here is host independent. The DOM lives behind the [`PostElement`],
//! [`PostSource`] and [`LegendView`] traits so the whole loop can be driven from tests.

mod classify;
mod config;
mod legend;
mod message;
mod reconcile;
mod script;
mod settings;
mod watch;

pub use classify::{
    classify, classify_minutes, classify_str, parse_timestamp, Bucket, BucketColors, PALETTE,
};
pub use config::ScriptConfig;
pub use legend::{legend_rows, Legend, LegendRow, LegendView, GLYPH_COLLAPSED, GLYPH_EXPANDED};
pub use message::{Ack, InboundMessage, UPDATE_SETTINGS_ACTION};
pub use reconcile::{
    apply, reconcile, remove, style_plan, ApplyOutcome, PostElement, PostSource, ReconcileReport,
    StyleField, CORNER_RADIUS, TRANSITION,
};
pub use script::ContentScript;
pub use settings::{ColorMode, LoadedSettings, Settings};
pub use watch::{BatchOutcome, MutationBatch, Watcher};

/// Errors surfaced by the core. None of them is fatal to the watcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChromaError {
    #[error("unparsable timestamp `{0}`")]
    InvalidTimestamp(String),
    #[error("host error: {0}")]
    Host(String),
}

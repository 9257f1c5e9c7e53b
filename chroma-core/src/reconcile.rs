//! Idempotent apply/remove of age styling on post elements.
//!
//! A post is either UNMARKED or MARKED(bucket). `apply` only moves UNMARKED posts,
//! `remove` only moves MARKED ones, and a settings change always goes through a
//! full remove-then-apply pass so fields from a previous mode never linger.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::{classify, parse_timestamp, Bucket, ColorMode, Settings};

pub const CORNER_RADIUS: &str = "8px";
pub const TRANSITION: &str = "all 0.3s ease";

/// The inline style properties owned by this crate. Nothing else is ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleField {
    BackgroundColor,
    Border,
    BorderRadius,
    Transition,
}

impl StyleField {
    pub const ALL: [StyleField; 4] = [
        StyleField::BackgroundColor,
        StyleField::Border,
        StyleField::BorderRadius,
        StyleField::Transition,
    ];

    pub fn css_property(self) -> &'static str {
        match self {
            StyleField::BackgroundColor => "background-color",
            StyleField::Border => "border",
            StyleField::BorderRadius => "border-radius",
            StyleField::Transition => "transition",
        }
    }
}

/// Handle to a post owned by the host document.
///
/// Methods take `&self`: handles behave like DOM references, mutation goes
/// through to the shared node.
pub trait PostElement {
    /// Raw datetime string of the post's time marker, if it has one.
    fn datetime(&self) -> Option<String>;
    fn is_marked(&self) -> bool;
    fn set_style(&self, field: StyleField, value: &str);
    fn clear_style(&self, field: StyleField);
    /// Sets the processed flag and records the bucket name.
    fn mark(&self, bucket: Bucket);
    fn unmark(&self);
}

/// Full-document query for posts.
pub trait PostSource {
    type Post: PostElement;

    fn posts(&self) -> Vec<Self::Post>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Marked(Bucket),
    AlreadyMarked,
    /// Mode is off or CSS removal is requested.
    Disabled,
    MissingTimestamp,
    InvalidTimestamp,
}

impl ApplyOutcome {
    pub fn is_marked(self) -> bool {
        matches!(self, ApplyOutcome::Marked(_))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Posts that were MARKED before the pass.
    pub removed: usize,
    /// Posts MARKED after the pass.
    pub marked: usize,
    /// Posts left UNMARKED because they have no usable timestamp.
    pub skipped: usize,
}

/// Fields and values painted for `bucket` under `mode`. Empty when the mode is off.
pub fn style_plan(bucket: Bucket, mode: ColorMode) -> Vec<(StyleField, &'static str)> {
    if mode == ColorMode::Off {
        return Vec::new();
    }

    let colors = bucket.colors();
    let mut plan = Vec::with_capacity(4);
    if mode.paints_background() {
        plan.push((StyleField::BackgroundColor, colors.background));
    }
    if mode.paints_border() {
        plan.push((StyleField::Border, colors.border));
    }
    plan.push((StyleField::BorderRadius, CORNER_RADIUS));
    plan.push((StyleField::Transition, TRANSITION));
    plan
}

/// UNMARKED → MARKED(bucket) when settings allow it and the post has a usable timestamp.
///
/// Every owned field is cleared before the plan is painted, so the result
/// depends only on bucket and mode.
pub fn apply<P>(post: &P, settings: &Settings, now: DateTime<Utc>) -> ApplyOutcome
where
    P: PostElement + ?Sized,
{
    if post.is_marked() {
        return ApplyOutcome::AlreadyMarked;
    }
    if !settings.styling_enabled() {
        return ApplyOutcome::Disabled;
    }

    let Some(raw) = post.datetime() else {
        debug!("post without time marker, skipping");
        return ApplyOutcome::MissingTimestamp;
    };
    let timestamp = match parse_timestamp(&raw) {
        Ok(timestamp) => timestamp,
        Err(err) => {
            debug!("{err}, skipping post");
            return ApplyOutcome::InvalidTimestamp;
        }
    };

    let bucket = classify(timestamp, now);
    for field in StyleField::ALL {
        post.clear_style(field);
    }
    for (field, value) in style_plan(bucket, settings.color_mode) {
        post.set_style(field, value);
    }
    post.mark(bucket);

    ApplyOutcome::Marked(bucket)
}

/// MARKED → UNMARKED. Returns false (and touches nothing) on an UNMARKED post,
/// so host styling on posts we never painted survives.
pub fn remove<P>(post: &P) -> bool
where
    P: PostElement + ?Sized,
{
    if !post.is_marked() {
        return false;
    }
    for field in StyleField::ALL {
        post.clear_style(field);
    }
    post.unmark();
    true
}

/// Brings every post in agreement with `settings` by removing then re-applying.
pub fn reconcile<'a, P, I>(posts: I, settings: &Settings, now: DateTime<Utc>) -> ReconcileReport
where
    P: PostElement + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let mut report = ReconcileReport::default();
    for post in posts {
        if remove(post) {
            report.removed += 1;
        }
        match apply(post, settings, now) {
            ApplyOutcome::Marked(_) => report.marked += 1,
            ApplyOutcome::MissingTimestamp | ApplyOutcome::InvalidTimestamp => report.skipped += 1,
            ApplyOutcome::AlreadyMarked | ApplyOutcome::Disabled => {}
        }
    }
    report
}

//! Legend widget state: a toggle control plus a popup listing the five buckets.

use log::warn;

use crate::{Bucket, ChromaError, ColorMode, Settings};

pub const GLYPH_COLLAPSED: &str = "+";
pub const GLYPH_EXPANDED: &str = "\u{2212}";

/// One line of the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendRow {
    pub bucket: Bucket,
    pub label: &'static str,
    /// Inline style of the color swatch.
    pub swatch_style: String,
}

/// Rows for the popup, swatches following what `mode` paints on posts.
/// `Off` shows the full swatch so the key still reads.
pub fn legend_rows(mode: ColorMode) -> Vec<LegendRow> {
    Bucket::ALL
        .into_iter()
        .map(|bucket| {
            let colors = bucket.colors();
            let swatch_style = match mode {
                ColorMode::Border => format!("border: {};", colors.border),
                ColorMode::Overlay => format!("background: {};", colors.swatch_background),
                ColorMode::Both | ColorMode::Off => format!(
                    "background: {}; border: {};",
                    colors.swatch_background, colors.border
                ),
            };
            LegendRow {
                bucket,
                label: bucket.label(),
                swatch_style,
            }
        })
        .collect()
}

/// Host side of the widget. Implementations own the two singleton elements.
pub trait LegendView {
    /// Builds and attaches the toggle and the (hidden) popup.
    fn create(&mut self) -> Result<(), ChromaError>;
    /// Detaches both elements.
    fn destroy(&mut self);
    /// False when the host page dropped the elements from the document.
    fn is_attached(&self) -> bool;
    fn render_rows(&mut self, rows: &[LegendRow]);
    fn set_toggle_visible(&mut self, visible: bool);
    fn set_popup_open(&mut self, open: bool);
    fn set_glyph(&mut self, glyph: &str);
}

/// Collapsed/expanded state machine, independent of post styling.
#[derive(Debug)]
pub struct Legend<V> {
    view: V,
    created: bool,
    expanded: bool,
    mode: ColorMode,
    rendered_mode: Option<ColorMode>,
}

impl<V: LegendView> Legend<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            created: false,
            expanded: false,
            mode: ColorMode::default(),
            rendered_mode: None,
        }
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Brings the widget in line with `settings`.
    ///
    /// CSS removal tears the widget down; otherwise the toggle is shown or hidden
    /// per `show_legend` (created lazily on first show) and the popup is closed.
    pub fn sync(&mut self, settings: &Settings) {
        self.mode = settings.color_mode;

        if settings.remove_css {
            self.teardown();
            return;
        }

        if settings.show_legend && !self.created {
            if let Err(err) = self.view.create() {
                warn!("legend unavailable: {err}");
                return;
            }
            self.created = true;
            self.rendered_mode = None;
        }

        if !self.created {
            return;
        }

        self.refresh_rows();
        self.view.set_toggle_visible(settings.show_legend);
        self.collapse();
    }

    /// Flips collapsed/expanded. Returns the new expanded state.
    pub fn toggle(&mut self) -> bool {
        if !self.created {
            return false;
        }

        if self.expanded {
            self.collapse();
        } else {
            self.refresh_rows();
            self.view.set_popup_open(true);
            self.view.set_glyph(GLYPH_EXPANDED);
            self.expanded = true;
        }
        self.expanded
    }

    /// Recreates the widget when the host page removed it while it should be shown.
    pub fn restore_if_detached(&mut self, settings: &Settings) {
        if self.created && settings.legend_visible() && !self.view.is_attached() {
            self.view.destroy();
            self.created = false;
            self.expanded = false;
            self.sync(settings);
        }
    }

    pub fn teardown(&mut self) {
        if self.created {
            self.view.destroy();
        }
        self.created = false;
        self.expanded = false;
        self.rendered_mode = None;
    }

    fn refresh_rows(&mut self) {
        if self.rendered_mode != Some(self.mode) {
            self.view.render_rows(&legend_rows(self.mode));
            self.rendered_mode = Some(self.mode);
        }
    }

    fn collapse(&mut self) {
        self.view.set_popup_open(false);
        self.view.set_glyph(GLYPH_COLLAPSED);
        self.expanded = false;
    }
}

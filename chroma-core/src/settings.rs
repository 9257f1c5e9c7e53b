//! User settings and migration from the legacy storage shape.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Which styling fields get painted on a post.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Both,
    Border,
    Overlay,
    Off,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Both => "both",
            ColorMode::Border => "border",
            ColorMode::Overlay => "overlay",
            ColorMode::Off => "off",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "both" => Some(ColorMode::Both),
            "border" => Some(ColorMode::Border),
            "overlay" => Some(ColorMode::Overlay),
            "off" => Some(ColorMode::Off),
            _ => None,
        }
    }

    pub fn paints_background(self) -> bool {
        matches!(self, ColorMode::Both | ColorMode::Overlay)
    }

    pub fn paints_border(self) -> bool {
        matches!(self, ColorMode::Both | ColorMode::Border)
    }
}

/// Display settings pushed by the extension popup. Replaced wholesale on update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub color_mode: ColorMode,
    pub show_legend: bool,
    /// Strips every trace of the extension from the page, whatever the mode.
    pub remove_css: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Both,
            show_legend: true,
            remove_css: false,
        }
    }
}

/// Result of reading the storage bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// The bag was not in the current shape and should be written back.
    pub migrated: bool,
}

impl Settings {
    /// True when posts should carry styling at all.
    pub fn styling_enabled(&self) -> bool {
        !self.remove_css && self.color_mode != ColorMode::Off
    }

    /// True when the legend toggle should be on screen.
    pub fn legend_visible(&self) -> bool {
        self.show_legend && !self.remove_css
    }

    /// Normalizes the raw storage bag, migrating the legacy boolean flags when
    /// `colorMode` is absent.
    pub fn from_stored(bag: &Value) -> LoadedSettings {
        let Some(items) = bag.as_object() else {
            return LoadedSettings {
                settings: Settings::default(),
                migrated: true,
            };
        };

        match items.get("colorMode") {
            Some(mode) => LoadedSettings {
                settings: Settings {
                    color_mode: parse_stored_mode(mode),
                    show_legend: flag(items, "showLegend").unwrap_or(true),
                    remove_css: flag(items, "removeCss").unwrap_or(false),
                },
                migrated: false,
            },
            None => LoadedSettings {
                settings: migrate_legacy(items),
                migrated: true,
            },
        }
    }

    /// Storage representation in the current shape.
    pub fn to_stored(&self) -> Value {
        json!({
            "colorMode": self.color_mode.as_str(),
            "showLegend": self.show_legend,
            "removeCss": self.remove_css,
        })
    }
}

/// Legacy rule table, first match wins: coding disabled → off, border only →
/// border, anything else (including both flags coherent) → both.
fn migrate_legacy(items: &Map<String, Value>) -> Settings {
    let color_mode = match (flag(items, "enableColorCoding"), flag(items, "borderOnly")) {
        (Some(false), _) => ColorMode::Off,
        (_, Some(true)) => ColorMode::Border,
        _ => ColorMode::Both,
    };

    Settings {
        color_mode,
        show_legend: flag(items, "showLegend").unwrap_or(true),
        remove_css: flag(items, "removeCss").unwrap_or(false),
    }
}

fn parse_stored_mode(value: &Value) -> ColorMode {
    match value.as_str().and_then(ColorMode::parse) {
        Some(mode) => mode,
        None => {
            warn!("unrecognised stored colorMode {value}, falling back to both");
            ColorMode::Both
        }
    }
}

fn flag(items: &Map<String, Value>, key: &str) -> Option<bool> {
    items.get(key).and_then(Value::as_bool)
}

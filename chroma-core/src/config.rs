use serde::{Deserialize, Serialize};

/// Fixed markup contract and timer delays of the content script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScriptConfig {
    /// Selector identifying a post element.
    pub post_selector: String,
    /// Selector of the time marker inside a post.
    pub timestamp_selector: String,
    /// Attribute on the time marker holding the machine readable datetime.
    pub timestamp_attribute: String,
    /// Class flagging a post as already processed.
    pub marker_class: String,
    /// Attribute recording the bucket name of a processed post.
    pub bucket_attribute: String,
    pub legend_toggle_id: String,
    pub legend_popup_id: String,
    /// Attribute identifying the injected legend stylesheet.
    pub style_tag_attribute: String,
    /// Delay of the one-shot full rescan after a batch containing posts.
    pub rescan_delay_ms: u32,
    /// Delay of the rescan that follows initialization.
    pub startup_rescan_delay_ms: u32,
    /// Quiet period before a storage change is re-applied.
    pub settings_debounce_ms: u32,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            post_selector: r#"[data-testid="tweet"]"#.to_string(),
            timestamp_selector: "time[datetime]".to_string(),
            timestamp_attribute: "datetime".to_string(),
            marker_class: "chrono-x-chroma".to_string(),
            bucket_attribute: "data-post-age".to_string(),
            legend_toggle_id: "chrono-x-chroma-legend".to_string(),
            legend_popup_id: "chrono-x-chroma-legend-popup".to_string(),
            style_tag_attribute: "data-chrono-x-chroma".to_string(),
            rescan_delay_ms: 100,
            startup_rescan_delay_ms: 2000,
            settings_debounce_ms: 10,
        }
    }
}

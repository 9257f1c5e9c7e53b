//! Content-script entry point: wires the live page, the extension APIs and the core together.

use chrono::DateTime;
use chroma_core::classify_str;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod runtime;

#[cfg(target_arch = "wasm32")]
pub use runtime::{apply_settings, start};

/// Bucket name for a raw datetime attribute, relative to `now_ms` (Unix epoch milliseconds).
#[wasm_bindgen(js_name = classifyDatetime)]
pub fn classify_datetime(raw: &str, now_ms: f64) -> Option<String> {
    if !now_ms.is_finite() {
        return None;
    }
    let now = DateTime::from_timestamp_millis(now_ms as i64)?;
    classify_str(raw, now).map(|bucket| bucket.name().to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn apply_settings(_: JsValue) -> Result<JsValue, JsValue> {
    Err(JsValue::from_str(
        "chroma-wasm only drives a page when compiled for wasm32",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: f64 = 1_714_564_800_000.0; // 2024-05-01T12:00:00Z

    #[test]
    fn classifies_relative_to_given_clock() {
        assert_eq!(
            classify_datetime("2024-05-01T11:58:00.000Z", NOW_MS).as_deref(),
            Some("very_recent")
        );
        assert_eq!(
            classify_datetime("2024-04-28T12:00:00.000Z", NOW_MS).as_deref(),
            Some("very_old")
        );
    }

    #[test]
    fn garbage_yields_nothing() {
        assert_eq!(classify_datetime("n/a", NOW_MS), None);
    }

    #[test]
    fn unusable_clock_yields_nothing() {
        let raw = "2024-05-01T11:58:00.000Z";
        assert_eq!(classify_datetime(raw, f64::NAN), None);
        assert_eq!(classify_datetime(raw, f64::INFINITY), None);
    }
}

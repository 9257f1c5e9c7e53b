use chroma_core::ScriptConfig;

/// Stylesheet for the legend toggle and popup, keyed on the configured ids.
pub fn legend_stylesheet(config: &ScriptConfig) -> String {
    format!(
        r#"
#{toggle} {{
  position: fixed;
  bottom: 20px;
  right: 20px;
  z-index: 10000;
  width: 36px;
  height: 36px;
  border-radius: 50%;
  display: flex;
  align-items: center;
  justify-content: center;
  background: rgba(21, 32, 43, 0.92);
  color: #ffffff;
  font: 600 20px/1 system-ui, -apple-system, 'Segoe UI', sans-serif;
  cursor: pointer;
  user-select: none;
  box-shadow: 0 4px 12px rgba(0, 0, 0, 0.3);
}}

#{toggle}:hover {{
  background: rgba(29, 155, 240, 0.92);
}}

#{popup} {{
  position: fixed;
  bottom: 64px;
  right: 20px;
  z-index: 10000;
  min-width: 220px;
  padding: 12px 14px;
  border-radius: 12px;
  background: rgba(21, 32, 43, 0.96);
  color: #e7e9ea;
  font: 13px/1.4 system-ui, -apple-system, 'Segoe UI', sans-serif;
  box-shadow: 0 8px 24px rgba(0, 0, 0, 0.35);
}}

#{popup} .legend-item {{
  display: flex;
  align-items: center;
  gap: 10px;
  padding: 4px 0;
}}

#{popup} .legend-color {{
  width: 18px;
  height: 18px;
  border-radius: 4px;
  box-sizing: border-box;
  flex-shrink: 0;
}}
"#,
        toggle = config.legend_toggle_id,
        popup = config.legend_popup_id,
    )
}

#[cfg(target_arch = "wasm32")]
pub fn ensure_styles(document: &web_sys::Document, config: &ScriptConfig) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::JsValue;

    let selector = format!("style[{}]", config.style_tag_attribute);
    if document.query_selector(&selector)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute(&config.style_tag_attribute, "v1")?;
    style_el.set_text_content(Some(&legend_stylesheet(config)));
    head.append_child(&style_el)?;

    Ok(())
}

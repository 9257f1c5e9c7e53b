use std::rc::Rc;

use chroma_core::{ChromaError, LegendRow, LegendView, ScriptConfig, GLYPH_COLLAPSED};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent};
use yew::prelude::*;
use yew::AppHandle;

use crate::styles;

#[derive(Properties, PartialEq)]
pub struct LegendKeyProps {
    pub rows: Vec<LegendRow>,
}

#[function_component(LegendKey)]
fn legend_key(props: &LegendKeyProps) -> Html {
    html! {
        <>
            { for props.rows.iter().map(render_row) }
        </>
    }
}

fn render_row(row: &LegendRow) -> Html {
    html! {
        <div class="legend-item" data-bucket={row.bucket.name()}>
            <div class="legend-color" style={row.swatch_style.clone()}></div>
            <span>{ row.label }</span>
        </div>
    }
}

/// Toggle + popup pair appended to `document.body`.
///
/// The popup content is a yew root mounted once per creation and updated
/// in place when the rows change.
pub struct DomLegendView {
    document: Document,
    config: Rc<ScriptConfig>,
    on_toggle: Rc<dyn Fn()>,
    toggle: Option<HtmlElement>,
    popup: Option<HtmlElement>,
    rows: Option<AppHandle<LegendKey>>,
    click: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl DomLegendView {
    /// `on_toggle` runs on every click of the toggle control.
    pub fn new(document: Document, config: Rc<ScriptConfig>, on_toggle: Rc<dyn Fn()>) -> Self {
        Self {
            document,
            config,
            on_toggle,
            toggle: None,
            popup: None,
            rows: None,
            click: None,
        }
    }

    fn build(&mut self) -> Result<(), JsValue> {
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        styles::ensure_styles(&self.document, &self.config)?;

        // Leftovers from a previous injection of the script.
        for id in [&self.config.legend_toggle_id, &self.config.legend_popup_id] {
            if let Some(stale) = self.document.get_element_by_id(id) {
                stale.remove();
            }
        }

        let toggle = self.create_div(&self.config.legend_toggle_id)?;
        toggle.set_text_content(Some(GLYPH_COLLAPSED));
        toggle.set_attribute("role", "button")?;
        toggle.set_attribute("aria-label", "Post age legend")?;
        toggle.set_title("Post age legend");

        let popup = self.create_div(&self.config.legend_popup_id)?;
        popup.style().set_property("display", "none")?;

        let on_toggle = Rc::clone(&self.on_toggle);
        let click = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| on_toggle());
        toggle.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;

        body.append_child(&toggle)?;
        body.append_child(&popup)?;

        let rows = yew::Renderer::<LegendKey>::with_root_and_props(
            popup.clone().into(),
            LegendKeyProps { rows: Vec::new() },
        )
        .render();

        self.toggle = Some(toggle);
        self.popup = Some(popup);
        self.rows = Some(rows);
        self.click = Some(click);
        Ok(())
    }

    fn create_div(&self, id: &str) -> Result<HtmlElement, JsValue> {
        let element = self.document.create_element("div")?;
        element.set_id(id);
        element.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }
}

impl LegendView for DomLegendView {
    fn create(&mut self) -> Result<(), ChromaError> {
        self.build()
            .map_err(|err| ChromaError::Host(format!("cannot build legend: {err:?}")))
    }

    fn destroy(&mut self) {
        if let Some(rows) = self.rows.take() {
            rows.destroy();
        }
        if let Some(toggle) = self.toggle.take() {
            if let Some(click) = self.click.as_ref() {
                let _ = toggle
                    .remove_event_listener_with_callback("click", click.as_ref().unchecked_ref());
            }
            toggle.remove();
        }
        if let Some(popup) = self.popup.take() {
            popup.remove();
        }
        self.click = None;
    }

    fn is_attached(&self) -> bool {
        match (&self.toggle, &self.popup) {
            (Some(toggle), Some(popup)) => toggle.is_connected() && popup.is_connected(),
            _ => false,
        }
    }

    fn render_rows(&mut self, rows: &[LegendRow]) {
        if let Some(handle) = self.rows.as_mut() {
            handle.update(LegendKeyProps {
                rows: rows.to_vec(),
            });
        }
    }

    fn set_toggle_visible(&mut self, visible: bool) {
        let Some(toggle) = &self.toggle else {
            return;
        };
        let style = toggle.style();
        let result = if visible {
            style.remove_property("display").map(drop)
        } else {
            style.set_property("display", "none")
        };
        if let Err(err) = result {
            warn!("cannot change legend visibility: {err:?}");
        }
    }

    fn set_popup_open(&mut self, open: bool) {
        if let Some(popup) = &self.popup {
            let display = if open { "block" } else { "none" };
            if let Err(err) = popup.style().set_property("display", display) {
                warn!("cannot change legend popup: {err:?}");
            }
        }
    }

    fn set_glyph(&mut self, glyph: &str) {
        if let Some(toggle) = &self.toggle {
            toggle.set_text_content(Some(glyph));
        }
    }
}

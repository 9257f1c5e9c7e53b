use std::rc::Rc;

use chroma_core::{Bucket, PostElement, PostSource, ScriptConfig, StyleField};
use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node, NodeList};

/// A post element of the live page.
#[derive(Debug, Clone)]
pub struct DomPost {
    element: HtmlElement,
    config: Rc<ScriptConfig>,
}

impl DomPost {
    pub fn new(element: HtmlElement, config: Rc<ScriptConfig>) -> Self {
        Self { element, config }
    }
}

impl PostElement for DomPost {
    fn datetime(&self) -> Option<String> {
        let marker = self
            .element
            .query_selector(&self.config.timestamp_selector)
            .ok()
            .flatten()?;
        marker
            .get_attribute(&self.config.timestamp_attribute)
            .filter(|raw| !raw.trim().is_empty())
    }

    fn is_marked(&self) -> bool {
        self.element.class_list().contains(&self.config.marker_class)
    }

    fn set_style(&self, field: StyleField, value: &str) {
        let result = self
            .element
            .style()
            .set_property(field.css_property(), value);
        report(result, field.css_property());
    }

    fn clear_style(&self, field: StyleField) {
        let result = self
            .element
            .style()
            .remove_property(field.css_property())
            .map(drop);
        report(result, field.css_property());
    }

    fn mark(&self, bucket: Bucket) {
        report(
            self.element
                .set_attribute(&self.config.bucket_attribute, bucket.name()),
            &self.config.bucket_attribute,
        );
        report(
            self.element.class_list().add_1(&self.config.marker_class),
            &self.config.marker_class,
        );
    }

    fn unmark(&self) {
        report(
            self.element.class_list().remove_1(&self.config.marker_class),
            &self.config.marker_class,
        );
        report(
            self.element
                .remove_attribute(&self.config.bucket_attribute),
            &self.config.bucket_attribute,
        );
    }
}

fn report(result: Result<(), JsValue>, what: &str) {
    if let Err(err) = result {
        warn!("cannot update {what} on post: {err:?}");
    }
}

/// The host document, queried for posts.
pub struct DomDocument {
    document: Document,
    config: Rc<ScriptConfig>,
}

impl DomDocument {
    pub fn new(document: Document, config: Rc<ScriptConfig>) -> Self {
        Self { document, config }
    }

    /// Posts of an inserted node: the node itself when it is a post, plus its
    /// post descendants. Text and comment nodes yield nothing.
    pub fn posts_in(&self, node: &Node) -> Vec<DomPost> {
        let Some(element) = node.dyn_ref::<Element>() else {
            return Vec::new();
        };

        let mut posts = Vec::new();
        if element.matches(&self.config.post_selector).unwrap_or(false) {
            if let Some(html) = element.dyn_ref::<HtmlElement>() {
                posts.push(DomPost::new(html.clone(), Rc::clone(&self.config)));
            }
        }

        match element.query_selector_all(&self.config.post_selector) {
            Ok(list) => posts.extend(self.collect(&list)),
            Err(err) => warn!("post query on inserted node failed: {err:?}"),
        }
        posts
    }

    fn collect(&self, list: &NodeList) -> Vec<DomPost> {
        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(|element| DomPost::new(element, Rc::clone(&self.config)))
            .collect()
    }
}

impl PostSource for DomDocument {
    type Post = DomPost;

    fn posts(&self) -> Vec<DomPost> {
        match self.document.query_selector_all(&self.config.post_selector) {
            Ok(list) => self.collect(&list),
            Err(err) => {
                warn!("post query failed: {err:?}");
                Vec::new()
            }
        }
    }
}

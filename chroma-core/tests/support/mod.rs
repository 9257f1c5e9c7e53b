#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use chroma_core::{
    Bucket, ChromaError, LegendRow, LegendView, PostElement, PostSource, ScriptConfig, StyleField,
};

pub fn reference_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .expect("valid reference time")
        .with_timezone(&Utc)
}

pub fn stamp_before(now: DateTime<Utc>, age: Duration) -> String {
    (now - age).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Default)]
pub struct PostState {
    pub datetime: Option<String>,
    pub styles: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
}

/// In-memory post with DOM-like shared handle semantics.
#[derive(Debug, Clone)]
pub struct FakePost(Rc<RefCell<PostState>>);

impl FakePost {
    pub fn with_datetime(raw: &str) -> Self {
        Self(Rc::new(RefCell::new(PostState {
            datetime: Some(raw.to_string()),
            ..PostState::default()
        })))
    }

    pub fn aged(now: DateTime<Utc>, age: Duration) -> Self {
        Self::with_datetime(&stamp_before(now, age))
    }

    pub fn without_timestamp() -> Self {
        Self(Rc::new(RefCell::new(PostState::default())))
    }

    pub fn set_host_style(&self, property: &str, value: &str) {
        self.0
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    pub fn styles(&self) -> BTreeMap<String, String> {
        self.0.borrow().styles.clone()
    }

    pub fn bucket_attribute(&self) -> Option<String> {
        let config = ScriptConfig::default();
        self.0.borrow().attributes.get(&config.bucket_attribute).cloned()
    }

    pub fn has_marker_class(&self) -> bool {
        let config = ScriptConfig::default();
        self.0.borrow().classes.contains(&config.marker_class)
    }
}

impl PostElement for FakePost {
    fn datetime(&self) -> Option<String> {
        self.0.borrow().datetime.clone()
    }

    fn is_marked(&self) -> bool {
        self.has_marker_class()
    }

    fn set_style(&self, field: StyleField, value: &str) {
        self.set_host_style(field.css_property(), value);
    }

    fn clear_style(&self, field: StyleField) {
        self.0.borrow_mut().styles.remove(field.css_property());
    }

    fn mark(&self, bucket: Bucket) {
        let config = ScriptConfig::default();
        let mut state = self.0.borrow_mut();
        state.classes.insert(config.marker_class);
        state
            .attributes
            .insert(config.bucket_attribute, bucket.name().to_string());
    }

    fn unmark(&self) {
        let config = ScriptConfig::default();
        let mut state = self.0.borrow_mut();
        state.classes.remove(&config.marker_class);
        state.attributes.remove(&config.bucket_attribute);
    }
}

#[derive(Debug, Default)]
pub struct FakeDocument {
    posts: RefCell<Vec<FakePost>>,
}

impl FakeDocument {
    pub fn with_posts(posts: Vec<FakePost>) -> Self {
        Self {
            posts: RefCell::new(posts),
        }
    }

    pub fn insert(&self, post: FakePost) {
        self.posts.borrow_mut().push(post);
    }

    pub fn marked_count(&self) -> usize {
        self.posts.borrow().iter().filter(|post| post.is_marked()).count()
    }
}

impl PostSource for FakeDocument {
    type Post = FakePost;

    fn posts(&self) -> Vec<FakePost> {
        self.posts.borrow().clone()
    }
}

#[derive(Debug, Default)]
pub struct LegendLog {
    pub attached: bool,
    pub creates: usize,
    pub destroys: usize,
    pub renders: usize,
    pub rows: Vec<LegendRow>,
    pub toggle_visible: bool,
    pub popup_open: bool,
    pub glyph: String,
    pub fail_create: bool,
}

/// Records what the legend asked the host to do. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct FakeLegendView(pub Rc<RefCell<LegendLog>>);

impl FakeLegendView {
    pub fn log(&self) -> std::cell::Ref<'_, LegendLog> {
        self.0.borrow()
    }

    /// Simulates the host page wiping the widget from the body.
    pub fn detach(&self) {
        self.0.borrow_mut().attached = false;
    }
}

impl LegendView for FakeLegendView {
    fn create(&mut self) -> Result<(), ChromaError> {
        let mut log = self.0.borrow_mut();
        if log.fail_create {
            return Err(ChromaError::Host("no document body".to_string()));
        }
        log.creates += 1;
        log.attached = true;
        log.toggle_visible = true;
        log.popup_open = false;
        Ok(())
    }

    fn destroy(&mut self) {
        let mut log = self.0.borrow_mut();
        log.destroys += 1;
        log.attached = false;
        log.rows.clear();
    }

    fn is_attached(&self) -> bool {
        self.0.borrow().attached
    }

    fn render_rows(&mut self, rows: &[LegendRow]) {
        let mut log = self.0.borrow_mut();
        log.renders += 1;
        log.rows = rows.to_vec();
    }

    fn set_toggle_visible(&mut self, visible: bool) {
        self.0.borrow_mut().toggle_visible = visible;
    }

    fn set_popup_open(&mut self, open: bool) {
        self.0.borrow_mut().popup_open = open;
    }

    fn set_glyph(&mut self, glyph: &str) {
        self.0.borrow_mut().glyph = glyph.to_string();
    }
}

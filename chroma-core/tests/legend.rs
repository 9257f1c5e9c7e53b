mod support;

use chroma_core::{
    legend_rows, Bucket, ColorMode, Legend, Settings, GLYPH_COLLAPSED, GLYPH_EXPANDED,
};
use support::FakeLegendView;

fn legend() -> (Legend<FakeLegendView>, FakeLegendView) {
    let view = FakeLegendView::default();
    (Legend::new(view.clone()), view)
}

#[test]
fn created_lazily_and_only_once() {
    let (mut legend, view) = legend();
    assert!(!legend.is_created());

    legend.sync(&Settings::default());
    legend.sync(&Settings::default());
    legend.sync(&Settings {
        color_mode: ColorMode::Border,
        ..Settings::default()
    });

    assert!(legend.is_created());
    assert_eq!(view.log().creates, 1);
    assert!(view.log().toggle_visible);
}

#[test]
fn hidden_legend_is_not_created() {
    let (mut legend, view) = legend();
    legend.sync(&Settings {
        show_legend: false,
        ..Settings::default()
    });

    assert!(!legend.is_created());
    assert_eq!(view.log().creates, 0);
}

#[test]
fn rows_are_regenerated_only_on_mode_change() {
    let (mut legend, view) = legend();
    legend.sync(&Settings::default());
    legend.sync(&Settings::default());
    assert_eq!(view.log().renders, 1);

    legend.sync(&Settings {
        color_mode: ColorMode::Overlay,
        ..Settings::default()
    });
    assert_eq!(view.log().renders, 2);
    assert_eq!(view.log().rows, legend_rows(ColorMode::Overlay));
}

#[test]
fn swatches_follow_mode() {
    let border = legend_rows(ColorMode::Border);
    assert_eq!(border.len(), 5);
    assert_eq!(border[0].swatch_style, "border: 2px solid #00ff00;");
    assert_eq!(border[0].label, "Very Recent (< 5 min)");

    let overlay = legend_rows(ColorMode::Overlay);
    assert_eq!(overlay[4].swatch_style, "background: rgba(128, 0, 128, 0.3);");

    let both = legend_rows(ColorMode::Both);
    assert_eq!(
        both[2].swatch_style,
        "background: rgba(255, 165, 0, 0.3); border: 2px solid #ffa500;"
    );
    let buckets: Vec<Bucket> = both.iter().map(|row| row.bucket).collect();
    assert_eq!(buckets, Bucket::ALL);
}

#[test]
fn toggle_flips_popup_and_glyph() {
    let (mut legend, view) = legend();
    legend.sync(&Settings::default());
    assert_eq!(view.log().glyph, GLYPH_COLLAPSED);

    assert!(legend.toggle());
    assert!(view.log().popup_open);
    assert_eq!(view.log().glyph, GLYPH_EXPANDED);

    assert!(!legend.toggle());
    assert!(!view.log().popup_open);
    assert_eq!(view.log().glyph, GLYPH_COLLAPSED);
}

#[test]
fn toggle_before_creation_does_nothing() {
    let (mut legend, view) = legend();
    assert!(!legend.toggle());
    assert!(!view.log().popup_open);
}

#[test]
fn external_visibility_change_forces_popup_closed() {
    let (mut legend, view) = legend();
    legend.sync(&Settings::default());
    legend.toggle();

    legend.sync(&Settings {
        show_legend: false,
        ..Settings::default()
    });

    assert!(!legend.is_expanded());
    assert!(!view.log().popup_open);
    assert!(!view.log().toggle_visible);
    assert_eq!(view.log().glyph, GLYPH_COLLAPSED);
    assert_eq!(view.log().destroys, 0);
}

#[test]
fn remove_css_tears_widget_down() {
    let (mut legend, view) = legend();
    legend.sync(&Settings::default());

    legend.sync(&Settings {
        remove_css: true,
        ..Settings::default()
    });

    assert!(!legend.is_created());
    assert_eq!(view.log().destroys, 1);
    assert!(!view.log().attached);

    legend.sync(&Settings::default());
    assert_eq!(view.log().creates, 2);
}

#[test]
fn detached_widget_is_restored() {
    let (mut legend, view) = legend();
    let settings = Settings::default();
    legend.sync(&settings);

    view.detach();
    legend.restore_if_detached(&settings);

    assert!(view.log().attached);
    assert_eq!(view.log().creates, 2);
    assert_eq!(view.log().rows.len(), 5);
}

#[test]
fn failed_creation_is_retried_later() {
    let (mut legend, view) = legend();
    view.0.borrow_mut().fail_create = true;
    legend.sync(&Settings::default());
    assert!(!legend.is_created());

    view.0.borrow_mut().fail_create = false;
    legend.sync(&Settings::default());
    assert!(legend.is_created());
}

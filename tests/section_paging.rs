//! Section focus and paging through the full picker (palette -> strip -> bubble field -> sink).

use bevy::prelude::*;
use bubble_picker::core::palette::{
    same_color, PaletteSection, PaletteSource, SelectionLog, StaticPalette, FALLBACK_COLOR,
};
use bubble_picker::gameplay::bubble_field::{BubbleField, TransitionDirection};
use bubble_picker::gameplay::picker::ColorPicker;
use bubble_picker::physics::field::RadialField;
use bubble_picker::PickerConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn section(title: &str, n: usize) -> PaletteSection {
    let colors: Vec<Color> = (0..n)
        .map(|i| Color::srgb(i as f32 / n as f32, 0.4, 0.6))
        .collect();
    PaletteSection {
        title: title.into(),
        default: colors[0],
        colors,
    }
}

fn picker_with(palette: impl PaletteSource + 'static, log: &SelectionLog) -> ColorPicker {
    let field = BubbleField::new(
        Box::new(RadialField::default()),
        Box::new(StdRng::seed_from_u64(21)),
    );
    ColorPicker::new(
        Box::new(palette),
        Box::new(log.clone()),
        field,
        &PickerConfig::default(),
        Vec2::new(420.0, 760.0),
    )
}

fn three_sections(log: &SelectionLog) -> ColorPicker {
    let palette = StaticPalette::new(
        50.0,
        vec![section("a", 5), section("b", 3), section("c", 4)],
    );
    picker_with(palette, log)
}

#[test]
fn paging_direction_follows_section_order() {
    let log = SelectionLog::new();
    let mut p = three_sections(&log);
    p.start();
    assert_eq!(p.field().live().len(), 5);

    let c = p.select_section(1).expect("section 1");
    assert_eq!(c.direction, TransitionDirection::Left);
    assert_eq!(p.field().live().len(), 3);

    let c = p.select_section(2).expect("section 2");
    assert_eq!(c.direction, TransitionDirection::Left);
    assert_eq!(p.field().live().len(), 4);

    let c = p.select_section(0).expect("section 0");
    assert_eq!(c.direction, TransitionDirection::Right);
    assert_eq!(p.field().live().len(), 5);

    assert!(p.select_section(0).is_none());
    assert!(log.is_empty());
}

#[test]
fn representative_colour_survives_paging() {
    let log = SelectionLog::new();
    let mut p = three_sections(&log);
    p.start();
    // Move the default (pre-selected) bubble out of the way and pick another one.
    let placed: Vec<_> = p
        .field()
        .live()
        .iter()
        .enumerate()
        .map(|(i, b)| (b.id(), Vec2::new(40.0 + 80.0 * i as f32, 200.0)))
        .collect();
    p.field_mut().sync_positions(placed);
    let pick = p.field().live()[3].clone();
    let event = p.handle_tap(pick.position()).expect("pick");
    assert_eq!(event.section, 0);
    assert_eq!(log.len(), 1);

    p.select_section(1);
    p.select_section(0);
    let selected = p.field().selected_bubble().expect("restored selection");
    assert!(same_color(selected.color(), pick.color()));
    assert_eq!(p.field().live().iter().filter(|b| b.is_selected()).count(), 1);
}

#[test]
fn dimmed_sections_and_ring_follow_focus() {
    let log = SelectionLog::new();
    let mut p = three_sections(&log);
    p.select_section(2);
    let strip = p.strip();
    let cfg = strip.config();
    assert_eq!(strip.focused(), Some(2));
    assert_eq!(strip.sections()[0].alpha(cfg), cfg.dimmed_alpha);
    assert_eq!(strip.sections()[2].alpha(cfg), 1.0);
    assert!(strip.ring_diameter() > strip.dot_diameter());
}

/// Provider that answers nothing beyond its counts.
struct SilentPalette;

impl PaletteSource for SilentPalette {
    fn section_count(&self) -> usize {
        2
    }
    fn bubble_diameter(&self) -> f32 {
        30.0
    }
    fn section_title(&self, _section: usize) -> Option<String> {
        None
    }
    fn default_color(&self, _section: usize) -> Option<Color> {
        None
    }
    fn color_count(&self, _section: usize) -> usize {
        2
    }
    fn color_at(&self, _section: usize, _index: usize) -> Option<Color> {
        None
    }
}

#[test]
fn missing_provider_answers_fall_back() {
    let log = SelectionLog::new();
    let mut p = picker_with(SilentPalette, &log);
    p.start();
    assert_eq!(p.strip().sections()[0].title, "");
    assert_eq!(p.strip().sections()[1].color, FALLBACK_COLOR);
    assert!(p.field().live().iter().all(|b| b.color() == FALLBACK_COLOR));
    // Both bubbles match the fallback representative; only the first stays selected.
    assert_eq!(p.field().live().iter().filter(|b| b.is_selected()).count(), 1);
}

#[test]
fn empty_palette_is_inert() {
    let log = SelectionLog::new();
    let mut p = picker_with(StaticPalette::new(50.0, Vec::new()), &log);
    p.start();
    assert!(p.field().live().is_empty());
    assert!(p.select_section(0).is_none());
    assert!(p.handle_tap(Vec2::new(10.0, 10.0)).is_none());
}

#[test]
fn resize_reconfigures_field_below_header() {
    let log = SelectionLog::new();
    let mut p = three_sections(&log);
    p.start();
    p.resize(Vec2::new(800.0, 600.0));
    let geometry = p.field().field().geometry();
    assert_eq!(geometry.extent, p.field_extent());
    assert_eq!(geometry.focus, p.field_extent() * 0.5);
    assert_eq!(p.field().live().len(), 5);
}

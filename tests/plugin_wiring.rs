//! Headless Bevy app tests for the picker systems (no window, renderer or Rapier stepping).

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::Velocity;
use bubble_picker::core::components::{BubbleBody, HeaderSectionButton};
use bubble_picker::core::palette::{PaletteSection, SelectionLog, StaticPalette};
use bubble_picker::interaction::input::pointer::{handle_header_buttons, tap_at_world};
use bubble_picker::physics::rapier_physics::apply_field_forces;
use bubble_picker::{BubbleField, ColorPicker, PickerConfig, PickerCorePlugin, RadialField};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

fn palette() -> StaticPalette {
    let section = |title: &str, base: f32| PaletteSection {
        title: title.into(),
        default: Color::srgb(base, 0.0, 0.0),
        colors: (0..4).map(|i| Color::srgb(base, i as f32 * 0.25, 0.5)).collect(),
    };
    StaticPalette::new(40.0, vec![section("one", 0.2), section("two", 0.8)])
}

fn test_app(log: &SelectionLog) -> App {
    let cfg = PickerConfig::default();
    let field = BubbleField::new(
        Box::new(RadialField::from_config(&cfg.field)),
        Box::new(StdRng::seed_from_u64(5)),
    );
    let picker = ColorPicker::new(
        Box::new(palette()),
        Box::new(log.clone()),
        field,
        &cfg,
        Vec2::new(400.0, 800.0),
    );
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)))
        .insert_resource(cfg)
        .insert_resource(picker)
        .add_plugins(PickerCorePlugin);
    app
}

#[test]
fn picker_starts_and_animates_without_a_window() {
    let log = SelectionLog::new();
    let mut app = test_app(&log);
    app.update();
    app.update();
    let picker = app.world().resource::<ColorPicker>();
    assert!(picker.is_started());
    assert_eq!(picker.field().live().len(), 4);
    let b = &picker.field().live()[0];
    assert!(b.opacity() > 0.0 && b.opacity() < 1.0, "entry fade in progress");
}

#[test]
fn header_press_pages_to_section() {
    let log = SelectionLog::new();
    let mut app = test_app(&log);
    app.add_systems(Update, handle_header_buttons);
    app.update();
    app.world_mut()
        .spawn((Interaction::Pressed, HeaderSectionButton { index: 1 }));
    app.update();
    let picker = app.world().resource::<ColorPicker>();
    assert_eq!(picker.focused_section(), Some(1));
    assert_eq!(picker.field().departing().len(), 4);
}

#[test]
fn field_forces_pull_registered_bodies_toward_focus() {
    let log = SelectionLog::new();
    let mut app = test_app(&log);
    app.add_systems(Update, apply_field_forces);
    app.update();
    let (id, unregistered) = {
        let picker = app.world().resource::<ColorPicker>();
        (picker.field().live()[0].id(), bubble_picker::core::components::BubbleId::next())
    };
    // World x = 150 is right of the field focus (world x = 0).
    let pulled = app
        .world_mut()
        .spawn((BubbleBody { id }, Transform::from_xyz(150.0, 0.0, 0.0), Velocity::zero()))
        .id();
    let ignored = app
        .world_mut()
        .spawn((
            BubbleBody { id: unregistered },
            Transform::from_xyz(150.0, 0.0, 0.0),
            Velocity::zero(),
        ))
        .id();
    app.update();
    let v = app.world().get::<Velocity>(pulled).expect("velocity").linvel;
    assert!(v.x < 0.0, "expected pull toward focus, got {v:?}");
    let v = app.world().get::<Velocity>(ignored).expect("velocity").linvel;
    assert_eq!(v, Vec2::ZERO);
}

#[test]
fn world_tap_selects_and_notifies() {
    let log = SelectionLog::new();
    let mut app = test_app(&log);
    app.update();
    let mut picker = app.world_mut().resource_mut::<ColorPicker>();
    let placed: Vec<_> = picker
        .field()
        .live()
        .iter()
        .enumerate()
        .map(|(i, b)| (b.id(), Vec2::new(60.0 + 90.0 * i as f32, 200.0)))
        .collect();
    picker.field_mut().sync_positions(placed);
    // Field (150, 200) is the second bubble; not pre-selected.
    let world = picker.field_to_world(Vec2::new(150.0, 200.0));
    let event = tap_at_world(&mut picker, world).expect("selection");
    assert_eq!(event.section, 0);
    assert_eq!(log.len(), 1);
    // Over the header: ignored.
    assert!(tap_at_world(&mut picker, Vec2::new(0.0, 395.0)).is_none());
}

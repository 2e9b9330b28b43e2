// This file is part of Bubble Picker.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::config::PickerConfig;
use crate::core::palette::{ColorSelected, StaticPalette};
use crate::core::system::system_order::PickerFlowSet;
use crate::gameplay::bubble_field::BubbleField;
use crate::gameplay::picker::ColorPicker;
use crate::interaction::input::keys::KeyboardPagingPlugin;
use crate::interaction::input::pointer::PointerInputPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::field::RadialField;
use crate::physics::rapier_physics::FieldPhysicsPlugin;
use crate::rendering::bubbles::BubbleRenderPlugin;
use crate::rendering::camera::CameraPlugin;
use crate::rendering::header_ui::HeaderUiPlugin;

/// Problems found while loading the config, reported once at startup.
#[derive(Resource, Debug, Default, Clone)]
pub struct ConfigWarnings(pub Vec<String>);

/// Everything needed to run the picker in a window. Insert a [`ColorPicker`] before adding the
/// plugin to supply your own palette and sink; otherwise one is built from [`PickerConfig`].
pub struct BubblePickerPlugin;

impl Plugin for BubblePickerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PickerConfig>()
            .init_resource::<ConfigWarnings>();
        let pixels_per_meter = app.world().resource::<PickerConfig>().field.pixels_per_meter;
        app.add_plugins(PickerCorePlugin).add_plugins((
            CameraPlugin,
            FieldPhysicsPlugin { pixels_per_meter },
            BubbleRenderPlugin,
            HeaderUiPlugin,
            PointerInputPlugin,
            KeyboardPagingPlugin,
            ConfigHotReloadPlugin,
            AutoClosePlugin,
        ));
    }
}

/// Headless part of the picker: system sets, the selection event, default picker construction
/// and per-frame advancement. No rendering or physics.
pub struct PickerCorePlugin;

impl Plugin for PickerCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PickerConfig>()
            .init_resource::<ConfigWarnings>()
            .add_event::<ColorSelected>()
            .configure_sets(
                Update,
                (
                    PickerFlowSet::SyncFromPhysics,
                    PickerFlowSet::Input,
                    PickerFlowSet::Animate,
                    PickerFlowSet::PrePhysics,
                )
                    .chain(),
            )
            .add_systems(Startup, (report_config_warnings, insert_default_picker))
            .add_systems(
                Update,
                (
                    track_view_extent.in_set(PickerFlowSet::SyncFromPhysics),
                    advance_picker.in_set(PickerFlowSet::Animate),
                ),
            );
        #[cfg(feature = "debug")]
        app.add_systems(Update, log_picker_stats);
    }
}

/// Picker over the configured palette with a logging sink. Without a configured seed, bubble
/// placement (and a random palette) use `fallback_seed`.
pub fn build_picker(cfg: &PickerConfig, fallback_seed: u64) -> (ColorPicker, Vec<String>) {
    let (palette, warnings) = StaticPalette::from_config(&cfg.palette, fallback_seed);
    let rng = StdRng::seed_from_u64(cfg.palette.seed.unwrap_or(fallback_seed));
    let field = BubbleField::new(Box::new(RadialField::from_config(&cfg.field)), Box::new(rng));
    let sink = |event: &ColorSelected| {
        info!(
            target: "picker",
            "colour selected: section {} -> {:?}",
            event.section,
            event.color.to_srgba()
        );
    };
    let view = Vec2::new(cfg.window.width, cfg.window.height);
    let picker = ColorPicker::new(Box::new(palette), Box::new(sink), field, cfg, view);
    (picker, warnings)
}

fn report_config_warnings(cfg: Res<PickerConfig>, warnings: Res<ConfigWarnings>) {
    for w in warnings.0.iter().chain(cfg.validate().iter()) {
        warn!(target: "config", "{w}");
    }
}

fn insert_default_picker(
    mut commands: Commands,
    cfg: Res<PickerConfig>,
    existing: Option<Res<ColorPicker>>,
) {
    if existing.is_some() {
        return;
    }
    let (picker, warnings) = build_picker(&cfg, rand::random());
    for w in warnings {
        warn!(target: "config", "{w}");
    }
    info!(
        target: "picker",
        "picker ready: {} sections, diameter {}",
        picker.strip().sections().len(),
        picker.diameter()
    );
    commands.insert_resource(picker);
}

/// Follow the primary window size and populate the picker on its first frame.
pub fn track_view_extent(
    windows: Query<&Window, With<PrimaryWindow>>,
    picker: Option<ResMut<ColorPicker>>,
) {
    let Some(mut picker) = picker else {
        return;
    };
    if let Ok(window) = windows.single() {
        let view = Vec2::new(window.width(), window.height());
        // Minimised windows report a zero size; keep the last layout.
        if view.x > 0.0 && view.y > 0.0 && view != picker.view() {
            debug!(target: "picker", "view resized to {view}");
            picker.resize(view);
        }
    }
    if !picker.is_started() {
        picker.start();
    }
}

pub fn advance_picker(time: Res<Time>, picker: Option<ResMut<ColorPicker>>) {
    if let Some(mut picker) = picker {
        picker.advance(time.delta_secs());
    }
}

#[cfg(feature = "debug")]
fn log_picker_stats(time: Res<Time>, picker: Option<Res<ColorPicker>>, mut acc: Local<f32>) {
    *acc += time.delta_secs();
    if *acc < 2.0 {
        return;
    }
    *acc = 0.0;
    let Some(picker) = picker else {
        return;
    };
    let field = picker.field();
    debug!(
        target: "picker",
        "section={:?} live={} departing={} selected={:?} bodies={}",
        picker.focused_section(),
        field.live().len(),
        field.departing().len(),
        field.selected(),
        field.field().body_count()
    );
}

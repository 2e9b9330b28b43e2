use bevy::prelude::*;

use crate::core::components::HeaderSectionButton;
use crate::core::palette::ColorSelected;
use crate::core::system::system_order::PickerFlowSet;
use crate::gameplay::picker::ColorPicker;

pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_header_buttons, handle_bubble_tap)
                .chain()
                .in_set(PickerFlowSet::Input),
        );
    }
}

/// Convert a window position (logical pixels, top-left origin) to world coordinates.
fn cursor_world_pos(camera_q: &Query<(&Camera, &GlobalTransform)>, screen_pos: Vec2) -> Option<Vec2> {
    let (camera, cam_tf) = camera_q.iter().next()?;
    camera.viewport_to_world_2d(cam_tf, screen_pos).ok()
}

/// Where the pointer was lifted this frame (touch first, then left mouse button).
fn released_pointer_world_pos(
    buttons: &ButtonInput<MouseButton>,
    touches: &Touches,
    window: &Window,
    camera_q: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    if let Some(touch) = touches.iter_just_released().next() {
        return cursor_world_pos(camera_q, touch.position());
    }
    if buttons.just_released(MouseButton::Left) {
        let cursor = window.cursor_position()?;
        return cursor_world_pos(camera_q, cursor);
    }
    None
}

/// Route a world-space tap to the picker. Taps over the header are ignored here; the header
/// buttons handle those.
pub fn tap_at_world(picker: &mut ColorPicker, world: Vec2) -> Option<ColorSelected> {
    if !picker.is_over_field(world) {
        return None;
    }
    let point = picker.world_to_field(world);
    picker.handle_tap(point)
}

fn handle_bubble_tap(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows_q: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    picker: Option<ResMut<ColorPicker>>,
    mut selected: EventWriter<ColorSelected>,
) {
    let Some(mut picker) = picker else {
        return;
    };
    let Ok(window) = windows_q.single() else {
        return;
    };
    let Some(world) = released_pointer_world_pos(&buttons, &touches, window, &camera_q) else {
        return;
    };
    if let Some(event) = tap_at_world(&mut picker, world) {
        selected.write(event);
    }
}

/// A pressed header section focuses that section and pages its bubbles in.
pub fn handle_header_buttons(
    buttons: Query<(&Interaction, &HeaderSectionButton), Changed<Interaction>>,
    picker: Option<ResMut<ColorPicker>>,
) {
    let Some(mut picker) = picker else {
        return;
    };
    for (interaction, button) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            picker.select_section(button.index);
        }
    }
}

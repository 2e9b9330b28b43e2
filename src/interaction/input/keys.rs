use bevy::prelude::*;

use crate::core::system::system_order::PickerFlowSet;
use crate::gameplay::picker::ColorPicker;

/// Arrow keys page between sections; `R` rebuilds the focused section.
pub struct KeyboardPagingPlugin;

impl Plugin for KeyboardPagingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_paging_keys.in_set(PickerFlowSet::Input));
    }
}

pub fn handle_paging_keys(keys: Res<ButtonInput<KeyCode>>, picker: Option<ResMut<ColorPicker>>) {
    let Some(mut picker) = picker else {
        return;
    };
    let Some(focused) = picker.focused_section() else {
        return;
    };
    if keys.just_pressed(KeyCode::ArrowRight) {
        picker.select_section(focused + 1);
    } else if keys.just_pressed(KeyCode::ArrowLeft) && focused > 0 {
        picker.select_section(focused - 1);
    } else if keys.just_pressed(KeyCode::KeyR) {
        picker.reload();
    }
}

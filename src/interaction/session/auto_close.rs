use crate::core::config::PickerConfig;
use crate::gameplay::picker::ColorPicker;
use bevy::prelude::*;

#[derive(Resource, Deref, DerefMut)]
struct AutoCloseTimer(Timer);

/// Picker state captured when the auto-close timer fires.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CloseSummary {
    pub section: Option<usize>,
    pub color: Option<Color>,
}

/// Exits after `window.autoClose` seconds (smoke runs and screenshots), logging what was picked.
pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_autoclose)
            .add_systems(Update, check_autoclose);
    }
}

fn setup_autoclose(mut commands: Commands, cfg: Res<PickerConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(target: "picker", seconds = secs, "auto-close armed");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn check_autoclose(
    mut commands: Commands,
    time: Res<Time>,
    timer: Option<ResMut<AutoCloseTimer>>,
    picker: Option<Res<ColorPicker>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }
    let summary = CloseSummary {
        section: picker.as_ref().and_then(|p| p.focused_section()),
        color: picker
            .as_ref()
            .and_then(|p| p.field().selected_bubble().map(|b| b.color())),
    };
    info!(
        target: "picker",
        "auto-close: section {:?}, selected {:?}",
        summary.section,
        summary.color.map(|c| c.to_srgba())
    );
    commands.insert_resource(summary);
    ev_exit.write(AppExit::Success);
}

use bevy::prelude::*;
use bevy::ui::{FocusPolicy, PositionType};

use crate::app::picker_app::advance_picker;
use crate::core::components::{HeaderDot, HeaderSectionButton, HeaderTitle};
use crate::core::system::system_order::PickerFlowSet;
use crate::gameplay::picker::ColorPicker;

const HEADER_BACKGROUND: Color = Color::srgb(0.97, 0.97, 0.97);
const TITLE_COLOR: Color = Color::srgb(0.15, 0.15, 0.18);
const RING_COLOR: Color = Color::srgb(0.2, 0.2, 0.2);

#[derive(Component)]
pub struct HeaderRoot;

/// Outline drawn around the focused section's dot.
#[derive(Component)]
pub struct SelectionRing;

pub struct HeaderUiPlugin;

impl Plugin for HeaderUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (spawn_header_ui, sync_header_ui)
                .chain()
                .after(advance_picker)
                .in_set(PickerFlowSet::Animate),
        );
    }
}

fn spawn_header_ui(
    mut commands: Commands,
    picker: Option<Res<ColorPicker>>,
    roots: Query<(), With<HeaderRoot>>,
) {
    let Some(picker) = picker else {
        return;
    };
    if !roots.is_empty() {
        return;
    }
    let strip = picker.strip();
    let font_size = strip.config().font_size;
    let label_height = strip.config().label_height;
    let ring_width = strip.config().ring_width;
    commands
        .spawn((
            Name::new("Header"),
            HeaderRoot,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Px(strip.height()),
                overflow: Overflow::clip(),
                ..default()
            },
            BackgroundColor(HEADER_BACKGROUND),
        ))
        .with_children(|root| {
            for section in strip.sections() {
                root.spawn((
                    Button,
                    HeaderSectionButton {
                        index: section.index,
                    },
                    Node {
                        position_type: PositionType::Absolute,
                        ..default()
                    },
                    BackgroundColor(Color::NONE),
                ))
                .with_children(|cell| {
                    cell.spawn((
                        HeaderTitle {
                            index: section.index,
                        },
                        Text::new(section.title.clone()),
                        TextFont {
                            font_size,
                            ..default()
                        },
                        TextColor(TITLE_COLOR),
                        Node {
                            position_type: PositionType::Absolute,
                            top: Val::Px(0.0),
                            height: Val::Px(label_height),
                            ..default()
                        },
                        FocusPolicy::Pass,
                    ));
                    cell.spawn((
                        HeaderDot {
                            index: section.index,
                        },
                        Node {
                            position_type: PositionType::Absolute,
                            ..default()
                        },
                        BorderRadius::MAX,
                        BackgroundColor(section.dot.color()),
                        FocusPolicy::Pass,
                    ));
                });
            }
            root.spawn((
                SelectionRing,
                Node {
                    position_type: PositionType::Absolute,
                    border: UiRect::all(Val::Px(ring_width)),
                    ..default()
                },
                BorderRadius::MAX,
                BorderColor(RING_COLOR),
                FocusPolicy::Pass,
            ));
        });
    info!(target: "picker", "header spawned with {} sections", strip.sections().len());
}

/// Mirror strip state onto the UI nodes, including header config changed by a hot reload.
#[allow(clippy::type_complexity)]
pub fn sync_header_ui(
    picker: Option<Res<ColorPicker>>,
    mut roots: Query<&mut Node, With<HeaderRoot>>,
    mut buttons: Query<
        (&HeaderSectionButton, &mut Node),
        (Without<HeaderRoot>, Without<HeaderDot>, Without<SelectionRing>),
    >,
    mut titles: Query<
        (&HeaderTitle, &mut TextColor, &mut TextFont, &mut Node),
        (
            Without<HeaderRoot>,
            Without<HeaderSectionButton>,
            Without<HeaderDot>,
            Without<SelectionRing>,
        ),
    >,
    mut dots: Query<
        (&HeaderDot, &mut Node, &mut BackgroundColor),
        (Without<HeaderRoot>, Without<HeaderSectionButton>, Without<SelectionRing>),
    >,
    mut rings: Query<
        (&mut Node, &mut Visibility),
        (With<SelectionRing>, Without<HeaderRoot>, Without<HeaderSectionButton>),
    >,
) {
    let Some(picker) = picker else {
        return;
    };
    let strip = picker.strip();
    let layout = *strip.layout();
    let cfg = strip.config();
    let scroll = strip.scroll_offset();
    let d = strip.dot_diameter();

    for mut node in roots.iter_mut() {
        node.height = Val::Px(layout.header_height);
    }
    for (button, mut node) in buttons.iter_mut() {
        node.left = Val::Px(layout.section_x(button.index) - scroll);
        node.top = Val::Px(0.0);
        node.width = Val::Px(layout.section_width);
        node.height = Val::Px(layout.header_height);
    }
    for (title, mut color, mut font, mut node) in titles.iter_mut() {
        let Some(section) = strip.section(title.index) else {
            continue;
        };
        node.width = Val::Px(layout.section_width);
        node.height = Val::Px(cfg.label_height);
        if font.font_size != cfg.font_size {
            font.font_size = cfg.font_size;
        }
        color.0 = TITLE_COLOR.with_alpha(section.alpha(cfg));
    }
    for (dot, mut node, mut bg) in dots.iter_mut() {
        let Some(section) = strip.section(dot.index) else {
            continue;
        };
        let size = d * section.dot.scale();
        // Dot position is relative to its section cell.
        let center = strip.dot_center(dot.index) - Vec2::new(layout.section_x(dot.index), 0.0);
        node.width = Val::Px(size);
        node.height = Val::Px(size);
        node.left = Val::Px(center.x - size * 0.5);
        node.top = Val::Px(center.y - size * 0.5);
        bg.0 = section
            .dot
            .color()
            .with_alpha(section.dot.opacity() * section.alpha(cfg));
    }
    for (mut node, mut visibility) in rings.iter_mut() {
        let Some(index) = strip.focused() else {
            *visibility = Visibility::Hidden;
            continue;
        };
        *visibility = Visibility::Inherited;
        node.border = UiRect::all(Val::Px(cfg.ring_width));
        let size = strip.ring_diameter();
        let center = strip.dot_center(index);
        node.width = Val::Px(size);
        node.height = Val::Px(size);
        node.left = Val::Px(center.x - scroll - size * 0.5);
        node.top = Val::Px(center.y - size * 0.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::picker_app::build_picker;
    use crate::core::config::PickerConfig;

    #[test]
    fn reloaded_header_config_reaches_title_and_ring() {
        let cfg = PickerConfig::default();
        let (mut picker, _) = build_picker(&cfg, 4);
        picker.start();
        let mut app = App::new();
        app.insert_resource(picker)
            .add_systems(Update, sync_header_ui);
        let title = app
            .world_mut()
            .spawn((
                HeaderTitle { index: 0 },
                TextColor(TITLE_COLOR),
                TextFont::default(),
                Node::default(),
            ))
            .id();
        let ring = app
            .world_mut()
            .spawn((SelectionRing, Node::default(), Visibility::Hidden))
            .id();
        app.update();

        let mut reloaded = cfg.clone();
        reloaded.header.font_size = cfg.header.font_size + 6.0;
        reloaded.header.label_height = cfg.header.label_height + 10.0;
        reloaded.header.ring_width = cfg.header.ring_width + 2.0;
        app.world_mut()
            .resource_mut::<ColorPicker>()
            .apply_config(&reloaded);
        app.update();

        let world = app.world();
        assert_eq!(
            world.get::<TextFont>(title).map(|f| f.font_size),
            Some(reloaded.header.font_size)
        );
        assert_eq!(
            world.get::<Node>(title).map(|n| n.height),
            Some(Val::Px(reloaded.header.label_height))
        );
        let ring_node = world.get::<Node>(ring).expect("ring node");
        assert_eq!(ring_node.border, UiRect::all(Val::Px(reloaded.header.ring_width)));
        assert_eq!(world.get::<Visibility>(ring), Some(&Visibility::Inherited));
    }
}

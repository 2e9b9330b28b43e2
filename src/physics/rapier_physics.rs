use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
#[cfg(feature = "debug")]
use bevy_rapier2d::render::{DebugRenderContext, RapierDebugRenderPlugin};

use crate::core::components::{BoundaryWall, BubbleBody};
use crate::core::system::system_order::PickerFlowSet;
use crate::gameplay::picker::ColorPicker;
use crate::physics::field::FieldGeometry;

/// Half-thickness of each boundary wall collider.
pub const WALL_HALF_THICKNESS: f32 = 10.0;

/// Rapier with global gravity disabled; bubbles are pulled only by the picker's force field.
pub struct FieldPhysicsPlugin {
    pub pixels_per_meter: f32,
}

impl Default for FieldPhysicsPlugin {
    fn default() -> Self {
        Self {
            pixels_per_meter: 100.0,
        }
    }
}

impl Plugin for FieldPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            self.pixels_per_meter,
        ))
        .add_systems(
            Update,
            (
                configure_gravity,
                sync_boundary_walls.in_set(PickerFlowSet::Animate),
                apply_field_forces.in_set(PickerFlowSet::PrePhysics),
            ),
        );
        #[cfg(feature = "debug")]
        app.add_plugins(RapierDebugRenderPlugin {
            enabled: false,
            ..default()
        })
        .add_systems(Update, toggle_physics_wireframe.in_set(PickerFlowSet::Input));
    }
}

/// F2 shows or hides collider outlines (bubbles and boundary walls).
#[cfg(feature = "debug")]
pub fn toggle_physics_wireframe(
    keys: Res<ButtonInput<KeyCode>>,
    ctx: Option<ResMut<DebugRenderContext>>,
) {
    if !keys.just_pressed(KeyCode::F2) {
        return;
    }
    if let Some(mut ctx) = ctx {
        ctx.enabled = !ctx.enabled;
        info!(target: "field", "collider wireframe {}", if ctx.enabled { "on" } else { "off" });
    }
}

/// The Rapier context (and its configuration component) appears during startup; zero its
/// gravity once it exists.
fn configure_gravity(mut rapier_cfg: Query<&mut RapierConfiguration>, mut done: Local<bool>) {
    if *done {
        return;
    }
    for mut cfg in rapier_cfg.iter_mut() {
        cfg.gravity = Vect::ZERO;
        *done = true;
    }
}

/// Centre and half-extents (world space) of each wall around `boundary`.
pub fn wall_layout(boundary: Rect, to_world: impl Fn(Vec2) -> Vec2) -> [(BoundaryWall, Vec2, Vec2); 4] {
    let t = WALL_HALF_THICKNESS;
    let center = to_world(boundary.center());
    let half = boundary.half_size();
    [
        (
            BoundaryWall::Bottom,
            Vec2::new(center.x, center.y - half.y - t),
            Vec2::new(half.x + t, t),
        ),
        (
            BoundaryWall::Top,
            Vec2::new(center.x, center.y + half.y + t),
            Vec2::new(half.x + t, t),
        ),
        (
            BoundaryWall::Left,
            Vec2::new(center.x - half.x - t, center.y),
            Vec2::new(t, half.y + t),
        ),
        (
            BoundaryWall::Right,
            Vec2::new(center.x + half.x + t, center.y),
            Vec2::new(t, half.y + t),
        ),
    ]
}

/// Keep four static colliders on the field's boundary loop; rebuilt whenever the geometry or
/// the view changes.
pub fn sync_boundary_walls(
    mut commands: Commands,
    picker: Option<Res<ColorPicker>>,
    mut walls: Query<(&BoundaryWall, &mut Transform, &mut Collider)>,
    mut last: Local<Option<(FieldGeometry, Vec2)>>,
) {
    let Some(picker) = picker else {
        return;
    };
    let geometry = picker.field().field().geometry();
    let key = (geometry, picker.view());
    if *last == Some(key) && !walls.is_empty() {
        return;
    }
    *last = Some(key);
    if geometry.is_inert() {
        return;
    }
    let layout = wall_layout(geometry.boundary, |p| picker.field_to_world(p));
    if walls.is_empty() {
        for (wall, center, half) in layout {
            commands.spawn((
                Name::new(format!("Wall{wall:?}")),
                wall,
                RigidBody::Fixed,
                Collider::cuboid(half.x, half.y),
                Friction::coefficient(0.0),
                Transform::from_translation(center.extend(0.0)),
                GlobalTransform::default(),
            ));
        }
    } else {
        for (wall, mut transform, mut collider) in walls.iter_mut() {
            if let Some((_, center, half)) = layout.iter().find(|(w, _, _)| w == wall) {
                transform.translation = center.extend(0.0);
                *collider = Collider::cuboid(half.x, half.y);
            }
        }
    }
    debug!(target: "field", "boundary walls -> {:?}", geometry.boundary);
}

/// v += a * dt for every registered bubble body (Rapier integrates position afterwards).
pub fn apply_field_forces(
    picker: Option<Res<ColorPicker>>,
    mut bodies: Query<(&BubbleBody, &Transform, &mut Velocity)>,
    time: Res<Time>,
) {
    let Some(picker) = picker else {
        return;
    };
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let field = picker.field().field();
    for (body, transform, mut vel) in bodies.iter_mut() {
        if !field.is_registered(body.id) {
            continue;
        }
        let p = picker.world_to_field(transform.translation.truncate());
        vel.linvel += field.acceleration_at(p) * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_enclose_boundary() {
        let boundary = Rect::new(0.0, 0.0, 200.0, 100.0);
        let layout = wall_layout(boundary, |p| p - Vec2::new(100.0, 50.0));
        let (_, bottom, half) = layout[0];
        assert_eq!(bottom, Vec2::new(0.0, -50.0 - WALL_HALF_THICKNESS));
        assert_eq!(half.x, 100.0 + WALL_HALF_THICKNESS);
        let (_, right, _) = layout[3];
        assert_eq!(right.x, 100.0 + WALL_HALF_THICKNESS);
    }

    #[cfg(feature = "debug")]
    #[test]
    fn f2_toggles_collider_wireframe() {
        let mut app = App::new();
        app.insert_resource(ButtonInput::<KeyCode>::default())
            .insert_resource(DebugRenderContext {
                enabled: false,
                ..default()
            })
            .add_systems(Update, toggle_physics_wireframe);
        app.update();
        assert!(!app.world().resource::<DebugRenderContext>().enabled);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::F2);
        app.update();
        assert!(app.world().resource::<DebugRenderContext>().enabled);
    }
}

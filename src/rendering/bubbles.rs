//! ECS mirror of the bubble model. Each bubble is a Rapier body entity (scaled by the selection
//! animation, which also grows its collider) with a circle mesh child scaled by diameter and
//! presence, faded through its own material.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashMap;

use crate::app::picker_app::advance_picker;
use crate::core::components::{BubbleBody, BubbleId, BubbleVisual};
use crate::core::system::system_order::PickerFlowSet;
use crate::gameplay::picker::ColorPicker;

pub const BUBBLE_Z: f32 = 10.0;
/// Superseded bubbles draw beneath the live set.
pub const DEPARTING_Z: f32 = BUBBLE_Z - 1.0;
const ADMISSION_Z_STEP: f32 = 0.01;

/// Draw depth of the live bubble at `index`; later admissions draw on top, matching hit-testing.
pub fn bubble_z(index: usize) -> f32 {
    BUBBLE_Z + index as f32 * ADMISSION_Z_STEP
}

#[derive(Resource)]
pub struct BubbleAssets {
    pub mesh: Handle<Mesh>,
}

impl FromWorld for BubbleAssets {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        Self {
            mesh: meshes.add(Circle::new(0.5)),
        }
    }
}

/// Body entity per bubble id, for live and departing bubbles alike.
#[derive(Resource, Default, Debug)]
pub struct BubbleEntities(pub HashMap<BubbleId, Entity>);

pub struct BubbleRenderPlugin;

impl Plugin for BubbleRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BubbleAssets>()
            .init_resource::<BubbleEntities>()
            .add_systems(
                Update,
                (
                    sync_from_physics.in_set(PickerFlowSet::SyncFromPhysics),
                    (
                        spawn_new_bubbles,
                        drive_departing,
                        sync_visuals,
                        despawn_removed,
                    )
                        .chain()
                        .after(advance_picker)
                        .in_set(PickerFlowSet::Animate),
                ),
            );
    }
}

/// Copy simulated positions of dynamic bodies back into the model (hit-testing reads them).
pub fn sync_from_physics(
    picker: Option<ResMut<ColorPicker>>,
    bodies: Query<(&BubbleBody, &Transform, &RigidBody)>,
) {
    let Some(mut picker) = picker else {
        return;
    };
    let positions: Vec<(BubbleId, Vec2)> = bodies
        .iter()
        .filter(|(_, _, rb)| matches!(rb, RigidBody::Dynamic))
        .map(|(b, t, _)| (b.id, picker.world_to_field(t.translation.truncate())))
        .collect();
    picker.field_mut().sync_positions(positions);
}

pub fn spawn_new_bubbles(
    mut commands: Commands,
    picker: Option<Res<ColorPicker>>,
    assets: Res<BubbleAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut entities: ResMut<BubbleEntities>,
) {
    let Some(picker) = picker else {
        return;
    };
    let damping = picker.field().field().damping();
    for (index, bubble) in picker.field().live().iter().enumerate() {
        if entities.0.contains_key(&bubble.id()) {
            continue;
        }
        let id = bubble.id();
        let world = picker.field_to_world(bubble.position());
        let material =
            materials.add(ColorMaterial::from(bubble.color().with_alpha(bubble.opacity())));
        let mut body = commands.spawn((
            Name::new("Bubble"),
            BubbleBody { id },
            Transform::from_translation(world.extend(bubble_z(index)))
                .with_scale(Vec3::splat(bubble.selection_scale())),
            Visibility::default(),
        ));
        // Degenerate bubbles get no collider; they stay where they were placed.
        if bubble.collider_radius() > 0.0 {
            body.insert((
                RigidBody::Dynamic,
                Collider::ball(bubble.collider_radius()),
                Velocity::zero(),
                Damping {
                    linear_damping: damping.linear,
                    angular_damping: 0.0,
                },
                Friction::coefficient(0.0),
                Sleeping::disabled(),
            ));
            if damping.lock_rotation {
                body.insert(LockedAxes::ROTATION_LOCKED);
            }
        }
        let entity = body.id();
        body.with_children(|parent| {
            parent.spawn((
                BubbleVisual { id },
                Mesh2d(assets.mesh.clone()),
                MeshMaterial2d(material),
                Transform::from_scale(Vec3::splat(bubble.diameter() * bubble.presence_scale())),
            ));
        });
        entities.0.insert(id, entity);
    }
}

/// Superseded bubbles leave the simulation: kinematic, no collisions, moved by their exit slide.
pub fn drive_departing(
    mut commands: Commands,
    picker: Option<Res<ColorPicker>>,
    entities: Res<BubbleEntities>,
    mut bodies: Query<(Option<&mut RigidBody>, &mut Transform), With<BubbleBody>>,
) {
    let Some(picker) = picker else {
        return;
    };
    for bubble in picker.field().departing() {
        let Some(&entity) = entities.0.get(&bubble.id()) else {
            continue;
        };
        let Ok((rb, mut transform)) = bodies.get_mut(entity) else {
            continue;
        };
        if let Some(mut rb) = rb {
            if !matches!(*rb, RigidBody::KinematicPositionBased) {
                *rb = RigidBody::KinematicPositionBased;
                commands.entity(entity).insert(ColliderDisabled);
            }
        }
        transform.translation = picker.field_to_world(bubble.position()).extend(DEPARTING_Z);
    }
}

pub fn sync_visuals(
    picker: Option<Res<ColorPicker>>,
    entities: Res<BubbleEntities>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut bodies: Query<&mut Transform, (With<BubbleBody>, Without<BubbleVisual>)>,
    mut visuals: Query<
        (&BubbleVisual, &mut Transform, &MeshMaterial2d<ColorMaterial>),
        Without<BubbleBody>,
    >,
) {
    let Some(picker) = picker else {
        return;
    };
    let field = picker.field();
    for (visual, mut transform, material) in visuals.iter_mut() {
        let Some(bubble) = field.bubble(visual.id) else {
            continue;
        };
        let scale = bubble.diameter() * bubble.presence_scale();
        if (transform.scale.x - scale).abs() > 1e-4 {
            transform.scale = Vec3::splat(scale);
        }
        let color = bubble.color().with_alpha(bubble.opacity());
        let stale = materials
            .get(&material.0)
            .is_some_and(|m| m.color != color);
        if stale {
            if let Some(m) = materials.get_mut(&material.0) {
                m.color = color;
            }
        }
    }
    let live = field.live().iter().enumerate().map(|(i, b)| (b, Some(bubble_z(i))));
    let departing = field.departing().iter().map(|b| (b, None));
    for (bubble, z) in live.chain(departing) {
        let Some(&entity) = entities.0.get(&bubble.id()) else {
            continue;
        };
        if let Ok(mut transform) = bodies.get_mut(entity) {
            let s = bubble.selection_scale();
            if (transform.scale.x - s).abs() > 1e-4 {
                transform.scale = Vec3::splat(s);
            }
            if let Some(z) = z {
                if transform.translation.z != z {
                    transform.translation.z = z;
                }
            }
        }
    }
}

pub fn despawn_removed(
    mut commands: Commands,
    picker: Option<ResMut<ColorPicker>>,
    mut entities: ResMut<BubbleEntities>,
) {
    let Some(mut picker) = picker else {
        return;
    };
    for id in picker.field_mut().drain_removed() {
        if let Some(entity) = entities.0.remove(&id) {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_admissions_draw_on_top() {
        assert!(bubble_z(1) > bubble_z(0));
        assert!(bubble_z(39) > bubble_z(38));
        assert!(DEPARTING_Z < bubble_z(0));
        // Well inside the 2D camera depth range.
        assert!(bubble_z(999) < 100.0);
    }
}

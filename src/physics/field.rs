//! Radial gravity + vortex force field over a rectangular boundary loop.
//!
//! The field is pure state: it knows which bodies are registered and what acceleration applies at
//! a point. Integration is either done by the caller (Rapier in the Bevy host, see
//! `physics::rapier_physics`) or by the default [`ForceField::step`] for headless use.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::core::components::BubbleId;
use crate::core::config::FieldConfig;

/// Derived geometry of a configured field. All zero for an unconfigured or degenerate extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub extent: Vec2,
    pub strength: f32,
    /// Interaction radius around the focus; no force beyond it.
    pub radius: f32,
    /// Distance below which the pull no longer grows.
    pub min_radius: f32,
    pub focus: Vec2,
    /// Edge loop keeping bodies inside the field.
    pub boundary: Rect,
}

impl FieldGeometry {
    pub const ZERO: Self = Self {
        extent: Vec2::ZERO,
        strength: 0.0,
        radius: 0.0,
        min_radius: 0.0,
        focus: Vec2::ZERO,
        boundary: Rect {
            min: Vec2::ZERO,
            max: Vec2::ZERO,
        },
    };

    pub fn is_inert(&self) -> bool {
        self.strength <= 0.0 || self.radius <= 0.0
    }
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDamping {
    pub linear: f32,
    pub lock_rotation: bool,
}

/// Minimal body state integrated by [`ForceField::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBody {
    pub id: BubbleId,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Pluggable force simulation the bubble controller drives.
pub trait ForceField: Send + Sync {
    /// Recompute strength, radius, focus and boundary for a new extent. Idempotent.
    fn configure(&mut self, extent: Vec2);
    fn geometry(&self) -> FieldGeometry;
    /// Returns false when the body was already registered.
    fn register(&mut self, id: BubbleId) -> bool;
    /// Returns false when the body was not registered.
    fn unregister(&mut self, id: BubbleId) -> bool;
    fn is_registered(&self, id: BubbleId) -> bool;
    fn body_count(&self) -> usize;
    fn damping(&self) -> BodyDamping;
    /// Acceleration (pixels/sec^2) felt by a body at `position`.
    fn acceleration_at(&self, position: Vec2) -> Vec2;

    /// Adopt new tuning without dropping registrations. Fields without tunables ignore it.
    fn apply_config(&mut self, _cfg: &FieldConfig) {}

    /// Semi-implicit Euler step for registered bodies. The boundary reflects outward-moving
    /// bodies instead of clamping them.
    fn step(&self, dt: f32, bodies: &mut [FieldBody]) {
        if dt <= 0.0 {
            return;
        }
        let geometry = self.geometry();
        let damping = 1.0 / (1.0 + dt * self.damping().linear.max(0.0));
        for body in bodies.iter_mut().filter(|b| self.is_registered(b.id)) {
            body.velocity += self.acceleration_at(body.position) * dt;
            body.velocity *= damping;
            body.position += body.velocity * dt;
            if geometry.is_inert() {
                continue;
            }
            let b = geometry.boundary;
            if (body.position.x < b.min.x && body.velocity.x < 0.0)
                || (body.position.x > b.max.x && body.velocity.x > 0.0)
            {
                body.velocity.x = -body.velocity.x;
            }
            if (body.position.y < b.min.y && body.velocity.y < 0.0)
                || (body.position.y > b.max.y && body.velocity.y > 0.0)
            {
                body.velocity.y = -body.velocity.y;
            }
        }
    }
}

/// Scalar tuning copied out of [`FieldConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub strength_per_extent: f32,
    pub radius_factor: f32,
    pub gain: f32,
    pub falloff: f32,
    pub vortex_strength: f32,
    pub linear_damping: f32,
}

impl From<&FieldConfig> for FieldParams {
    fn from(c: &FieldConfig) -> Self {
        Self {
            strength_per_extent: c.strength_per_extent,
            radius_factor: c.radius_factor,
            gain: c.gain,
            falloff: c.falloff,
            vortex_strength: c.vortex_strength,
            linear_damping: c.linear_damping,
        }
    }
}

impl Default for FieldParams {
    fn default() -> Self {
        Self::from(&FieldConfig::default())
    }
}

/// Pull toward the extent centre with a slight counter-clockwise drift.
#[derive(Debug, Clone, Default)]
pub struct RadialField {
    params: FieldParams,
    geometry: FieldGeometry,
    bodies: HashSet<BubbleId>,
}

impl RadialField {
    pub fn new(params: FieldParams) -> Self {
        Self {
            params,
            geometry: FieldGeometry::ZERO,
            bodies: HashSet::new(),
        }
    }

    pub fn from_config(cfg: &FieldConfig) -> Self {
        Self::new(FieldParams::from(cfg))
    }

    pub fn params(&self) -> FieldParams {
        self.params
    }

    /// Swap tuning in place, keeping registrations. Geometry is recomputed for the current extent.
    pub fn set_params(&mut self, params: FieldParams) {
        self.params = params;
        let extent = self.geometry.extent;
        self.configure(extent);
    }
}

impl ForceField for RadialField {
    fn configure(&mut self, extent: Vec2) {
        if !extent.is_finite() || extent.x <= 0.0 || extent.y <= 0.0 {
            self.geometry = FieldGeometry::ZERO;
            return;
        }
        let strength = (extent.x.max(extent.y) * self.params.strength_per_extent).max(0.0);
        let radius = strength.sqrt() * self.params.radius_factor.max(0.0);
        let focus = extent * 0.5;
        let boundary = Rect::new(focus.x - radius * 0.5, 0.0, focus.x + radius * 0.5, extent.y);
        self.geometry = FieldGeometry {
            extent,
            strength,
            radius,
            min_radius: radius,
            focus,
            boundary,
        };
    }

    fn geometry(&self) -> FieldGeometry {
        self.geometry
    }

    fn register(&mut self, id: BubbleId) -> bool {
        self.bodies.insert(id)
    }

    fn unregister(&mut self, id: BubbleId) -> bool {
        self.bodies.remove(&id)
    }

    fn is_registered(&self, id: BubbleId) -> bool {
        self.bodies.contains(&id)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn damping(&self) -> BodyDamping {
        BodyDamping {
            linear: self.params.linear_damping,
            lock_rotation: true,
        }
    }

    fn acceleration_at(&self, position: Vec2) -> Vec2 {
        let g = &self.geometry;
        if g.is_inert() {
            return Vec2::ZERO;
        }
        let offset = g.focus - position;
        let d = offset.length();
        if d < 1e-4 || d > g.radius {
            return Vec2::ZERO;
        }
        let dir = offset / d;
        let pull = self.params.gain * g.strength / d.max(g.min_radius).powf(self.params.falloff);
        // Tangential drift: perpendicular to the pull, counter-clockwise around the focus.
        let swirl = -dir.perp() * self.params.vortex_strength * g.strength;
        dir * pull + swirl
    }

    fn apply_config(&mut self, cfg: &FieldConfig) {
        self.set_params(FieldParams::from(cfg));
    }
}

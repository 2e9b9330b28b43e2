use bevy::prelude::*;

use crate::core::components::BubbleId;
use crate::core::config::{BubbleAnimConfig, FieldConfig};
use crate::gameplay::tween::Tween;

/// Lifecycle phase. Only `Live` bubbles are hit-testable and registered with the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubblePhase {
    Live,
    /// Sliding off-screen after being superseded; destroys itself when the slide ends.
    Exiting,
    /// Fading out; removed once the fade completes.
    Destroying,
    Removed,
}

/// Per-bubble animation constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleStyle {
    pub selected_scale: f32,
    pub select_duration: f32,
    pub destroy_duration: f32,
    /// Collider radius relative to the visual radius.
    pub collider_scale: f32,
}

impl Default for BubbleStyle {
    fn default() -> Self {
        Self::from_config(&BubbleAnimConfig::default(), &FieldConfig::default())
    }
}

impl BubbleStyle {
    pub fn from_config(anim: &BubbleAnimConfig, field: &FieldConfig) -> Self {
        Self {
            selected_scale: anim.selected_scale,
            select_duration: anim.select_duration,
            destroy_duration: anim.destroy_duration,
            collider_scale: field.collider_scale,
        }
    }
}

/// A selectable colour circle.
///
/// Visual scale is the product of two independent animations: the selection scale (1.0 or
/// `selected_scale`, driven only by [`Bubble::set_selected`]) and the presence scale (entry and
/// exit ramps). Opacity belongs to the presence animation alone.
#[derive(Debug, Clone)]
pub struct Bubble {
    id: BubbleId,
    color: Color,
    radius: f32,
    position: Vec2,
    velocity: Vec2,
    selected: bool,
    phase: BubblePhase,
    style: BubbleStyle,
    selection_scale: Tween<f32>,
    presence_scale: Tween<f32>,
    opacity: Tween<f32>,
    motion: Option<Tween<Vec2>>,
}

impl Bubble {
    /// Radius <= 0 (or NaN) yields a degenerate, invisible but valid bubble.
    pub fn new(color: Color, radius: f32) -> Self {
        Self {
            id: BubbleId::next(),
            color,
            radius: radius.max(0.0),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            selected: false,
            phase: BubblePhase::Live,
            style: BubbleStyle::default(),
            selection_scale: Tween::settled(1.0),
            presence_scale: Tween::settled(1.0),
            opacity: Tween::settled(1.0),
            motion: None,
        }
    }

    pub fn with_style(mut self, style: BubbleStyle) -> Self {
        self.style = style;
        let scale = self.resting_selection_scale();
        self.selection_scale.snap(scale);
        self
    }

    /// Marks the bubble as arriving already selected (no expand animation).
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.reset_selection(selected);
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn id(&self) -> BubbleId {
        self.id
    }
    pub fn color(&self) -> Color {
        self.color
    }
    pub fn radius(&self) -> f32 {
        self.radius
    }
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }
    pub fn position(&self) -> Vec2 {
        self.position
    }
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
    pub fn is_selected(&self) -> bool {
        self.selected
    }
    pub fn phase(&self) -> BubblePhase {
        self.phase
    }
    pub fn is_removed(&self) -> bool {
        self.phase == BubblePhase::Removed
    }
    pub fn style(&self) -> BubbleStyle {
        self.style
    }

    fn resting_selection_scale(&self) -> f32 {
        if self.selected {
            self.style.selected_scale
        } else {
            1.0
        }
    }

    /// Expand (selected) or shrink back. Same value is a no-op; returns whether a
    /// transition started.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;
        let target = self.resting_selection_scale();
        self.selection_scale
            .retarget(target, self.style.select_duration);
        true
    }

    /// Set the flag and snap the selection scale to match.
    pub(crate) fn reset_selection(&mut self, selected: bool) {
        self.selected = selected;
        let scale = self.resting_selection_scale();
        self.selection_scale.snap(scale);
    }

    /// Start invisible (zero scale and opacity).
    pub fn hide(&mut self) {
        self.presence_scale.snap(0.0);
        self.opacity.snap(0.0);
    }

    pub fn fade_in(&mut self, duration: f32) {
        self.presence_scale.retarget(1.0, duration);
        self.opacity.retarget(1.0, duration);
    }

    /// Slide to `target` while fading out and shrinking to `scale`; destroys itself on arrival.
    pub fn begin_exit(&mut self, target: Vec2, duration: f32, scale: f32) {
        if self.phase != BubblePhase::Live {
            return;
        }
        self.phase = BubblePhase::Exiting;
        self.velocity = Vec2::ZERO;
        self.motion = Some(Tween::new(self.position, target, duration));
        self.presence_scale.retarget(scale, duration);
        self.opacity.retarget(0.0, duration);
    }

    /// Always fades out first; the bubble reports removal from [`Bubble::advance`] once the
    /// fade completes, never synchronously.
    pub fn destroy(&mut self) {
        if matches!(self.phase, BubblePhase::Destroying | BubblePhase::Removed) {
            return;
        }
        self.phase = BubblePhase::Destroying;
        self.opacity.retarget(0.0, self.style.destroy_duration);
    }

    /// Tick all animations. Returns true on the tick the bubble becomes removed.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.phase == BubblePhase::Removed {
            return false;
        }
        self.selection_scale.tick(dt);
        self.presence_scale.tick(dt);
        let opacity_done = self.opacity.tick(dt) || self.opacity.is_finished();
        if let Some(motion) = self.motion.as_mut() {
            motion.tick(dt);
            self.position = motion.value();
        }
        match self.phase {
            BubblePhase::Exiting => {
                if self.motion.as_ref().is_none_or(|m| m.is_finished()) {
                    self.destroy();
                }
                false
            }
            BubblePhase::Destroying if opacity_done => {
                self.phase = BubblePhase::Removed;
                true
            }
            _ => false,
        }
    }

    pub fn visual_scale(&self) -> f32 {
        self.selection_scale.value() * self.presence_scale.value()
    }

    pub fn selection_scale(&self) -> f32 {
        self.selection_scale.value()
    }

    pub fn presence_scale(&self) -> f32 {
        self.presence_scale.value()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    /// Radius of the tappable circle (grows with the selection expansion).
    pub fn hit_radius(&self) -> f32 {
        self.radius * self.selection_scale.value()
    }

    pub fn collider_radius(&self) -> f32 {
        self.radius * self.style.collider_scale
    }

    /// Exact circle containment.
    pub fn contains(&self, point: Vec2) -> bool {
        let r = self.hit_radius();
        r > 0.0 && self.position.distance_squared(point) <= r * r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bubble() -> Bubble {
        Bubble::new(Color::srgb(1.0, 0.0, 0.0), 25.0)
    }

    #[test]
    fn select_expands_and_deselect_shrinks() {
        let mut b = bubble();
        assert!(b.set_selected(true));
        b.advance(0.1);
        let mid = b.visual_scale();
        assert!(mid > 1.0 && mid < 1.75);
        b.advance(0.2);
        assert!((b.visual_scale() - 1.75).abs() < 1e-5);
        assert!(b.set_selected(false));
        b.advance(0.3);
        assert!((b.visual_scale() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn setting_current_value_does_not_restart() {
        let mut b = bubble();
        b.set_selected(true);
        b.advance(0.1);
        let mid = b.visual_scale();
        assert!(!b.set_selected(true));
        assert_eq!(b.visual_scale(), mid);
    }

    #[test]
    fn destroy_is_asynchronous() {
        let mut b = bubble();
        b.destroy();
        assert_eq!(b.phase(), BubblePhase::Destroying);
        assert!(!b.is_removed());
        assert!(!b.advance(0.1));
        assert!(b.advance(0.15));
        assert!(b.is_removed());
        assert!(!b.advance(0.1));
    }

    #[test]
    fn exit_slides_then_destroys() {
        let mut b = bubble().with_position(Vec2::new(100.0, 40.0));
        b.begin_exit(Vec2::new(-50.0, 40.0), 0.5, 0.3);
        assert!(!b.advance(0.5));
        assert_eq!(b.position(), Vec2::new(-50.0, 40.0));
        assert_eq!(b.phase(), BubblePhase::Destroying);
        assert!(b.advance(0.2));
    }

    #[test]
    fn degenerate_radius_is_valid_but_untappable() {
        let b = Bubble::new(Color::BLACK, -3.0);
        assert_eq!(b.radius(), 0.0);
        assert!(!b.contains(Vec2::ZERO));
    }

    #[test]
    fn hit_region_is_a_circle_not_a_box() {
        let b = bubble().with_position(Vec2::new(50.0, 50.0));
        assert!(b.contains(Vec2::new(70.0, 50.0)));
        // Inside the bounding box corner, outside the circle.
        assert!(!b.contains(Vec2::new(72.0, 72.0)));
    }

    #[test]
    fn preselected_arrives_expanded() {
        let b = bubble().with_selected(true);
        assert!(b.is_selected());
        assert!((b.visual_scale() - 1.75).abs() < 1e-5);
    }
}

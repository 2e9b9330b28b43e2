use bevy::prelude::*;
use rand::{Rng, RngCore};

use crate::core::components::BubbleId;
use crate::core::config::BubbleAnimConfig;
use crate::gameplay::bubble::Bubble;
use crate::physics::field::{FieldBody, ForceField};

/// Paging intent of a transition. `Left` sweeps the old set off the left edge while the new set
/// streams in from the right; `Right` mirrors it; `All` picks a side per bubble at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Left,
    Right,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTiming {
    pub exit_duration: f32,
    pub exit_scale: f32,
    pub entry_duration: f32,
}

impl From<&BubbleAnimConfig> for TransitionTiming {
    fn from(c: &BubbleAnimConfig) -> Self {
        Self {
            exit_duration: c.exit_duration,
            exit_scale: c.exit_scale,
            entry_duration: c.entry_duration,
        }
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::from(&BubbleAnimConfig::default())
    }
}

/// Result of a tap that changed the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TappedBubble {
    pub id: BubbleId,
    pub color: Color,
}

/// Owns the live bubble set of the focused section and the force field its bubbles float in.
///
/// `live` is authoritative for hit-testing and physics the moment a transition starts; superseded
/// bubbles keep animating in `departing` until their own fade completes, then their ids land in
/// the removal outbox.
pub struct BubbleField {
    field: Box<dyn ForceField>,
    rng: Box<dyn RngCore + Send + Sync>,
    timing: TransitionTiming,
    extent: Vec2,
    live: Vec<Bubble>,
    departing: Vec<Bubble>,
    selected: Option<BubbleId>,
    removed: Vec<BubbleId>,
}

impl BubbleField {
    pub fn new(field: Box<dyn ForceField>, rng: Box<dyn RngCore + Send + Sync>) -> Self {
        Self {
            field,
            rng,
            timing: TransitionTiming::default(),
            extent: Vec2::ZERO,
            live: Vec::new(),
            departing: Vec::new(),
            selected: None,
            removed: Vec::new(),
        }
    }

    pub fn with_timing(mut self, timing: TransitionTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn set_timing(&mut self, timing: TransitionTiming) {
        self.timing = timing;
    }

    /// Resize. In-flight animations are untouched; only future forces and the boundary change.
    pub fn configure(&mut self, extent: Vec2) {
        self.extent = extent;
        self.field.configure(extent);
    }

    fn pick_left(&mut self, direction: TransitionDirection, exiting: bool) -> bool {
        match direction {
            TransitionDirection::Left => exiting,
            TransitionDirection::Right => !exiting,
            TransitionDirection::All => self.rng.gen_bool(0.5),
        }
    }

    fn off_screen_x(&self, left: bool, diameter: f32) -> f32 {
        if left {
            -diameter
        } else {
            self.extent.x + diameter
        }
    }

    /// Sweep the current set off-screen and admit `incoming` from the opposite side.
    pub fn transition_to(
        &mut self,
        incoming: Vec<Bubble>,
        direction: TransitionDirection,
        should_fade: bool,
    ) {
        for mut bubble in std::mem::take(&mut self.live) {
            let left = self.pick_left(direction, true);
            let target = Vec2::new(
                self.off_screen_x(left, bubble.diameter()),
                bubble.position().y,
            );
            self.field.unregister(bubble.id());
            bubble.begin_exit(target, self.timing.exit_duration, self.timing.exit_scale);
            self.departing.push(bubble);
        }
        self.selected = None;

        let mut live = Vec::with_capacity(incoming.len());
        for mut bubble in incoming {
            if should_fade {
                bubble.hide();
            }
            let d = bubble.diameter();
            let left = self.pick_left(direction, false);
            let x = self.off_screen_x(left, d);
            let (lo, hi) = (d, self.extent.y - d);
            let y = if hi > lo {
                self.rng.gen_range(lo..=hi)
            } else {
                self.extent.y * 0.5
            };
            bubble.set_position(Vec2::new(x, y));
            bubble.set_velocity(Vec2::ZERO);
            self.field.register(bubble.id());
            if bubble.is_selected() {
                if self.selected.is_none() {
                    self.selected = Some(bubble.id());
                } else {
                    bubble.reset_selection(false);
                }
            }
            if should_fade {
                bubble.fade_in(self.timing.entry_duration);
            }
            live.push(bubble);
        }
        self.live = live;
    }

    pub fn clear(&mut self, direction: TransitionDirection) {
        self.transition_to(Vec::new(), direction, false);
    }

    /// Topmost live bubble whose circle contains `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<&Bubble> {
        self.live.iter().rev().find(|b| b.contains(point))
    }

    /// Select the bubble under `point`. `None` when nothing was hit or the hit bubble is already
    /// selected; taps never deselect.
    pub fn handle_tap(&mut self, point: Vec2) -> Option<TappedBubble> {
        let hit = self.live.iter().rposition(|b| b.contains(point))?;
        let id = self.live[hit].id();
        if self.selected == Some(id) {
            return None;
        }
        if let Some(previous) = self.selected {
            if let Some(b) = self.live.iter_mut().find(|b| b.id() == previous) {
                b.set_selected(false);
            }
        }
        let bubble = &mut self.live[hit];
        bubble.set_selected(true);
        self.selected = Some(id);
        Some(TappedBubble {
            id,
            color: bubble.color(),
        })
    }

    pub fn advance(&mut self, dt: f32) {
        for bubble in &mut self.live {
            bubble.advance(dt);
        }
        let removed = &mut self.removed;
        self.departing.retain_mut(|b| {
            if b.advance(dt) {
                removed.push(b.id());
                false
            } else {
                true
            }
        });
    }

    /// Ids of bubbles whose exit has fully finished since the last drain.
    pub fn drain_removed(&mut self) -> Vec<BubbleId> {
        std::mem::take(&mut self.removed)
    }

    /// Write simulated positions back into live bubbles. Unknown ids are ignored.
    pub fn sync_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (BubbleId, Vec2)>,
    {
        for (id, position) in positions {
            if let Some(b) = self.live.iter_mut().find(|b| b.id() == id) {
                b.set_position(position);
            }
        }
    }

    /// Integrate live bubbles with the field's own stepper.
    pub fn step_physics(&mut self, dt: f32) {
        let mut bodies: Vec<FieldBody> = self
            .live
            .iter()
            .map(|b| FieldBody {
                id: b.id(),
                position: b.position(),
                velocity: b.velocity(),
            })
            .collect();
        self.field.step(dt, &mut bodies);
        for (bubble, body) in self.live.iter_mut().zip(bodies) {
            bubble.set_position(body.position);
            bubble.set_velocity(body.velocity);
        }
    }

    pub fn live(&self) -> &[Bubble] {
        &self.live
    }

    pub fn departing(&self) -> &[Bubble] {
        &self.departing
    }

    pub fn selected(&self) -> Option<BubbleId> {
        self.selected
    }

    pub fn selected_bubble(&self) -> Option<&Bubble> {
        let id = self.selected?;
        self.live.iter().find(|b| b.id() == id)
    }

    /// Live or departing bubble by id.
    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.live
            .iter()
            .chain(self.departing.iter())
            .find(|b| b.id() == id)
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    pub fn field(&self) -> &dyn ForceField {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> &mut dyn ForceField {
        self.field.as_mut()
    }
}

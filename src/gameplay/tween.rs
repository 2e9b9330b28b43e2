//! Fixed-duration eased animations. Re-targeting restarts from the current value so an
//! animation interrupted mid-flight continues without a jump.

use bevy::prelude::*;

pub trait Lerp: Copy {
    fn lerp_to(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

/// Smoothstep ease-in-out on 0..1.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    elapsed: f32,
    duration: f32,
}

impl<T: Lerp> Tween<T> {
    /// A tween already resting at `value`.
    pub fn settled(value: T) -> Self {
        Self {
            from: value,
            to: value,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    pub fn new(from: T, to: T, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn value(&self) -> T {
        if self.is_finished() {
            self.to
        } else {
            self.from
                .lerp_to(self.to, ease_in_out(self.elapsed / self.duration))
        }
    }

    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }

    /// Animate from the current value towards `to`, replacing any in-flight animation.
    pub fn retarget(&mut self, to: T, duration: f32) {
        *self = Self::new(self.value(), to, duration);
    }

    /// Jump to `value` without animating.
    pub fn snap(&mut self, value: T) {
        *self = Self::settled(value);
    }

    /// Advance by `dt` seconds. Returns true on the tick the animation completes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.is_finished() {
            return false;
        }
        self.elapsed += dt.max(0.0);
        self.is_finished()
    }
}

use bevy::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUBBLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a bubble, shared by the model, the force field and the ECS body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BubbleId(pub u64);

impl BubbleId {
    pub fn next() -> Self {
        Self(NEXT_BUBBLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Marker on the physics body entity of a bubble (holds rigid body & collider).
#[derive(Component, Debug, Clone, Copy)]
pub struct BubbleBody {
    pub id: BubbleId,
}

/// Tag for the circle mesh child; scaled and faded independently of the collider.
#[derive(Component, Debug, Clone, Copy)]
pub struct BubbleVisual {
    pub id: BubbleId,
}

/// One of the four static colliders forming the field's boundary loop.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryWall {
    Bottom,
    Top,
    Left,
    Right,
}

/// Clickable header section (Bevy UI button).
#[derive(Component, Debug, Clone, Copy)]
pub struct HeaderSectionButton {
    pub index: usize,
}

/// Representative colour dot inside a header section.
#[derive(Component, Debug, Clone, Copy)]
pub struct HeaderDot {
    pub index: usize,
}

/// Title label inside a header section.
#[derive(Component, Debug, Clone, Copy)]
pub struct HeaderTitle {
    pub index: usize,
}

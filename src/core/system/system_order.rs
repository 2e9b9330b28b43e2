//! Central system ordering labels to make the picker update sequence explicit.
//! Stages (high-level, all inside `Update` and chained):
//! 1. SyncFromPhysics (window extent tracked, simulated body positions copied back into the model)
//! 2. Input (header presses, paging keys, bubble taps)
//! 3. Animate (model animations advanced, entities spawned/despawned, visuals synced)
//! 4. PrePhysics (field forces written into Rapier velocities)
//! Rapier itself steps in `PostUpdate` (handled by its plugin).
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum PickerFlowSet {
    SyncFromPhysics,
    Input,
    Animate,
    PrePhysics,
}

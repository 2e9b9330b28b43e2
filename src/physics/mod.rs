pub mod field;
pub mod rapier_physics;

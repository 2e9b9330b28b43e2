pub mod bubble;
pub mod bubble_field;
pub mod header;
pub mod picker;
pub mod tween;

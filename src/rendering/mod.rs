pub mod bubbles;
pub mod camera;
pub mod header_ui;

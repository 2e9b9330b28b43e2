pub mod app;
pub mod core;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::picker_app::{build_picker, BubblePickerPlugin, ConfigWarnings, PickerCorePlugin};
pub use core::config::PickerConfig;
pub use core::palette::{ColorSelected, ColorSink, PaletteSource, SelectionLog, StaticPalette};
pub use gameplay::bubble_field::{BubbleField, TransitionDirection};
pub use gameplay::picker::ColorPicker;
pub use physics::field::{ForceField, RadialField};

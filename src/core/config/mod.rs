pub mod config;

pub use config::{
    BubbleAnimConfig, FieldConfig, HeaderConfig, PaletteConfig, PickerConfig, SectionConfig,
    WindowConfig,
};

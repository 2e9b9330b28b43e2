use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    /// Automatically close the app after this many seconds. 0.0 (or omitted) = run indefinitely.
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 760.0,
            title: "Bubble Picker".into(),
            auto_close: 0.0,
        }
    }
}

/// Radial gravity + vortex field tuning. Strength and radius are derived from the field
/// extent on every resize; these values only scale that derivation.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub strength_per_extent: f32,
    pub radius_factor: f32,
    /// Converts field strength into pixels/sec^2.
    pub gain: f32,
    pub falloff: f32,
    pub vortex_strength: f32,
    pub linear_damping: f32,
    pub collider_scale: f32,
    pub pixels_per_meter: f32,
}
impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            strength_per_extent: 100.0,
            radius_factor: 100.0,
            gain: 150.0,
            falloff: 1.0,
            vortex_strength: 0.0005,
            linear_damping: 1.5,
            collider_scale: 1.01,
            pixels_per_meter: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BubbleAnimConfig {
    pub selected_scale: f32,
    pub select_duration: f32,
    pub destroy_duration: f32,
    pub exit_duration: f32,
    pub exit_scale: f32,
    pub entry_duration: f32,
}
impl Default for BubbleAnimConfig {
    fn default() -> Self {
        Self {
            selected_scale: 1.75,
            select_duration: 0.2,
            destroy_duration: 0.2,
            exit_duration: 0.5,
            exit_scale: 0.3,
            entry_duration: 0.7,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HeaderConfig {
    /// Inset from the strip edges before the first / after the last section.
    pub inset: f32,
    pub spacing: f32,
    /// Header height as a fraction of the view height (lower-bounded by the dot size).
    pub height_fraction: f32,
    /// Extra room around the dot used for the minimum header height and section width.
    pub dot_padding: f32,
    pub dimmed_alpha: f32,
    pub ring_scale: f32,
    pub ring_width: f32,
    pub dot_fade_duration: f32,
    pub label_height: f32,
    pub dot_gap: f32,
    pub font_size: f32,
}
impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            inset: 15.0,
            spacing: 10.0,
            height_fraction: 0.15,
            dot_padding: 20.0,
            dimmed_alpha: 0.4,
            ring_scale: 1.15,
            ring_width: 1.5,
            dot_fade_duration: 0.3,
            label_height: 20.0,
            dot_gap: 10.0,
            font_size: 16.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SectionConfig {
    pub title: String,
    /// Hex colour (`#rrggbb` / `rrggbb`) initially shown as the section's selection.
    pub default: String,
    pub colors: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    pub diameter: f32,
    /// Seed for random palettes and bubble placement. None = seeded from entropy.
    pub seed: Option<u64>,
    /// Used only when `sections` is empty: a random palette of this shape is generated.
    pub random_sections: usize,
    pub random_colors: usize,
    pub sections: Vec<SectionConfig>,
}
impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            diameter: 50.0,
            seed: None,
            random_sections: 3,
            random_colors: 5,
            sections: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PickerConfig {
    pub window: WindowConfig,
    pub field: FieldConfig,
    pub bubbles: BubbleAnimConfig,
    pub header: HeaderConfig,
    pub palette: PaletteConfig,
}

impl PickerConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Loads every readable file in order and deep-merges their RON maps (later files win).
    /// Returns the config, the paths that contributed, and any read/parse errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        match merged {
            Some(val) => match val.into_rust::<PickerConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (PickerConfig::default(), used, errors)
                }
            },
            None => (PickerConfig::default(), used, errors),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        let f = &self.field;
        if f.strength_per_extent <= 0.0 {
            w.push("field.strength_per_extent must be > 0; bubbles will not be pulled in".into());
        }
        if f.radius_factor <= 0.0 {
            w.push("field.radius_factor must be > 0; field region collapses".into());
        }
        if f.gain <= 0.0 {
            w.push("field.gain must be > 0".into());
        }
        if f.falloff < 0.0 {
            w.push("field.falloff negative -> force grows with distance".into());
        }
        if f.linear_damping <= 0.0 {
            w.push(format!(
                "field.linear_damping {} must be > 0; bubbles will oscillate indefinitely",
                f.linear_damping
            ));
        }
        if !(1.0..=1.2).contains(&f.collider_scale) {
            w.push(format!(
                "field.collider_scale {} outside 1.0..1.2 typical bounds",
                f.collider_scale
            ));
        }
        if f.pixels_per_meter <= 0.0 {
            w.push("field.pixels_per_meter must be > 0".into());
        }
        let b = &self.bubbles;
        if b.selected_scale < 1.0 {
            w.push(format!(
                "bubbles.selected_scale {} < 1.0 -> selected bubble shrinks",
                b.selected_scale
            ));
        }
        for (label, v) in [
            ("bubbles.select_duration", b.select_duration),
            ("bubbles.destroy_duration", b.destroy_duration),
            ("bubbles.exit_duration", b.exit_duration),
            ("bubbles.entry_duration", b.entry_duration),
            ("header.dot_fade_duration", self.header.dot_fade_duration),
        ] {
            if v < 0.0 {
                w.push(format!("{label} {v} negative -> treated as instant"));
            }
        }
        if !(0.0..=1.0).contains(&b.exit_scale) {
            w.push(format!("bubbles.exit_scale {} outside 0..1", b.exit_scale));
        }
        if !(0.0..=1.0).contains(&self.header.dimmed_alpha) {
            w.push(format!(
                "header.dimmed_alpha {} outside 0..1",
                self.header.dimmed_alpha
            ));
        }
        if self.palette.diameter <= 0.0 {
            w.push("palette.diameter must be > 0; bubbles will be invisible".into());
        }
        if self.palette.sections.is_empty() && self.palette.random_sections == 0 {
            w.push("palette has no sections and random_sections is 0; nothing to pick".into());
        }
        for (i, s) in self.palette.sections.iter().enumerate() {
            if s.colors.is_empty() {
                w.push(format!("palette.sections[{i}] '{}' has no colors", s.title));
            }
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_clean() {
        let cfg = PickerConfig::default();
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg: PickerConfig = ron::from_str("(bubbles: (selected_scale: 2.0))").unwrap();
        assert_eq!(cfg.bubbles.selected_scale, 2.0);
        assert_eq!(cfg.bubbles.select_duration, 0.2);
        assert_eq!(cfg.field, FieldConfig::default());
    }

    #[test]
    fn validate_flags_bad_damping_and_empty_section() {
        let mut cfg = PickerConfig::default();
        cfg.field.linear_damping = 0.0;
        cfg.palette.sections.push(SectionConfig {
            title: "Empty".into(),
            ..Default::default()
        });
        let warnings = cfg.validate().join("\n");
        assert!(warnings.contains("linear_damping"));
        assert!(warnings.contains("'Empty' has no colors"));
    }
}

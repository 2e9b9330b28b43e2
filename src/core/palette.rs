//! Data provider and event sink seams of the picker, plus the stock implementations used by the
//! demo host (config-driven and seeded-random palettes, a shared selection log).

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

use crate::core::config::PaletteConfig;

/// Colour used whenever the data provider has no answer.
pub const FALLBACK_COLOR: Color = Color::srgb(0.0, 0.0, 1.0);

/// A colour was picked for a section.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ColorSelected {
    pub color: Color,
    pub section: usize,
}

/// Supplies sections and their colours on demand. Missing answers fall back to
/// `FALLBACK_COLOR`, an empty title or a zero count.
pub trait PaletteSource: Send + Sync {
    fn section_count(&self) -> usize;
    /// Diameter shared by every bubble.
    fn bubble_diameter(&self) -> f32;
    fn section_title(&self, section: usize) -> Option<String>;
    /// The colour initially recorded as the section's selection.
    fn default_color(&self, section: usize) -> Option<Color>;
    fn color_count(&self, section: usize) -> usize;
    fn color_at(&self, section: usize, index: usize) -> Option<Color>;
}

/// Receives picked colours.
pub trait ColorSink: Send + Sync {
    fn color_selected(&mut self, event: &ColorSelected);
}

impl<F> ColorSink for F
where
    F: FnMut(&ColorSelected) + Send + Sync,
{
    fn color_selected(&mut self, event: &ColorSelected) {
        self(event)
    }
}

/// Cloneable sink recording every selection; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct SelectionLog(Arc<Mutex<Vec<ColorSelected>>>);

impl SelectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<ColorSelected> {
        self.0.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<ColorSelected> {
        self.0
            .lock()
            .map(|mut v| std::mem::take(&mut *v))
            .unwrap_or_default()
    }
}

impl ColorSink for SelectionLog {
    fn color_selected(&mut self, event: &ColorSelected) {
        if let Ok(mut log) = self.0.lock() {
            log.push(event.clone());
        }
    }
}

/// Parses `#rrggbb`, `rrggbb`, `#rgb` or `#rrggbbaa`.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    Srgba::hex(hex.trim()).ok().map(Color::from)
}

/// Colour equality after conversion to sRGBA, tolerant to float noise.
pub fn same_color(a: Color, b: Color) -> bool {
    let (a, b) = (a.to_srgba(), b.to_srgba());
    const EPS: f32 = 1.0 / 512.0;
    (a.red - b.red).abs() < EPS
        && (a.green - b.green).abs() < EPS
        && (a.blue - b.blue).abs() < EPS
        && (a.alpha - b.alpha).abs() < EPS
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteSection {
    pub title: String,
    pub default: Color,
    pub colors: Vec<Color>,
}

/// Fixed in-memory palette.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticPalette {
    pub diameter: f32,
    pub sections: Vec<PaletteSection>,
}

impl StaticPalette {
    pub fn new(diameter: f32, sections: Vec<PaletteSection>) -> Self {
        Self { diameter, sections }
    }

    /// Random colours per section; the default colour is independent of the offered colours,
    /// so nothing is pre-selected until the user picks.
    pub fn random(seed: u64, sections: usize, colors_per_section: usize, diameter: f32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let random_color = |rng: &mut StdRng| Color::srgb(rng.gen(), rng.gen(), rng.gen());
        let sections = (0..sections)
            .map(|i| PaletteSection {
                title: format!("section {i}"),
                default: random_color(&mut rng),
                colors: (0..colors_per_section)
                    .map(|_| random_color(&mut rng))
                    .collect(),
            })
            .collect();
        Self { diameter, sections }
    }

    /// Builds the palette described by the config. Unparseable colours become `FALLBACK_COLOR`
    /// and are reported. An empty section list yields a random palette.
    pub fn from_config(cfg: &PaletteConfig, fallback_seed: u64) -> (Self, Vec<String>) {
        if cfg.sections.is_empty() {
            let seed = cfg.seed.unwrap_or(fallback_seed);
            return (
                Self::random(seed, cfg.random_sections, cfg.random_colors, cfg.diameter),
                Vec::new(),
            );
        }
        let mut warnings = Vec::new();
        let mut parse = |label: String, hex: &str| {
            parse_hex_color(hex).unwrap_or_else(|| {
                warnings.push(format!("{label}: invalid colour '{hex}', using fallback"));
                FALLBACK_COLOR
            })
        };
        let sections = cfg
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| PaletteSection {
                title: s.title.clone(),
                default: parse(format!("palette.sections[{i}].default"), &s.default),
                colors: s
                    .colors
                    .iter()
                    .enumerate()
                    .map(|(j, hex)| parse(format!("palette.sections[{i}].colors[{j}]"), hex))
                    .collect(),
            })
            .collect();
        (Self::new(cfg.diameter, sections), warnings)
    }
}

impl PaletteSource for StaticPalette {
    fn section_count(&self) -> usize {
        self.sections.len()
    }
    fn bubble_diameter(&self) -> f32 {
        self.diameter
    }
    fn section_title(&self, section: usize) -> Option<String> {
        self.sections.get(section).map(|s| s.title.clone())
    }
    fn default_color(&self, section: usize) -> Option<Color> {
        self.sections.get(section).map(|s| s.default)
    }
    fn color_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |s| s.colors.len())
    }
    fn color_at(&self, section: usize, index: usize) -> Option<Color> {
        self.sections.get(section)?.colors.get(index).copied()
    }
}

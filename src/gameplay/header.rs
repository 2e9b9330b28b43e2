//! Section header strip: focus tracking, paging direction and layout of the horizontally
//! scrolling row of sections. Coordinates are UI space (origin top-left of the strip, y down).

use bevy::prelude::*;

use crate::core::config::HeaderConfig;
use crate::gameplay::bubble_field::TransitionDirection;
use crate::gameplay::tween::Tween;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    pub title: String,
    pub color: Color,
}

/// The coloured dot under a section title showing its current pick.
#[derive(Debug, Clone)]
pub struct RepresentativeDot {
    color: Color,
    scale: Tween<f32>,
    opacity: Tween<f32>,
    pending: Option<Color>,
    fading: bool,
}

impl RepresentativeDot {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            scale: Tween::settled(1.0),
            opacity: Tween::settled(1.0),
            pending: None,
            fading: false,
        }
    }

    /// Recolour in place and show at full size; cancels a pending swap.
    pub fn replace_color(&mut self, color: Color) {
        self.color = color;
        self.pending = None;
        self.fading = false;
        self.scale.snap(1.0);
        self.opacity.snap(1.0);
    }

    /// Shrink and fade to nothing. The scale is restored once the fade ends; opacity stays at
    /// zero until the next `replace_color`.
    pub fn fade_out(&mut self, duration: f32) {
        self.fading = true;
        self.scale.retarget(0.0, duration);
        self.opacity.retarget(0.0, duration);
    }

    /// Fade out, then reappear in `color`.
    pub fn swap_color(&mut self, color: Color, duration: f32) {
        self.fade_out(duration);
        self.pending = Some(color);
    }

    pub fn advance(&mut self, dt: f32) {
        self.scale.tick(dt);
        self.opacity.tick(dt);
        if self.fading && self.scale.is_finished() && self.opacity.is_finished() {
            self.fading = false;
            match self.pending.take() {
                Some(color) => self.replace_color(color),
                None => self.scale.snap(1.0),
            }
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }
    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }
    pub fn is_fading(&self) -> bool {
        self.fading
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub index: usize,
    pub title: String,
    /// Representative colour (the section's current pick).
    pub color: Color,
    pub focused: bool,
    pub dot: RepresentativeDot,
}

impl Section {
    pub fn alpha(&self, cfg: &HeaderConfig) -> f32 {
        if self.focused {
            1.0
        } else {
            cfg.dimmed_alpha
        }
    }
}

/// Geometry of the strip for a given view size and section count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripLayout {
    pub view: Vec2,
    pub header_height: f32,
    pub section_width: f32,
    pub inset: f32,
    pub spacing: f32,
    pub content_width: f32,
    /// Left offset of the content; non-zero only when the content is narrower than the view.
    pub content_origin: f32,
}

impl StripLayout {
    pub fn compute(cfg: &HeaderConfig, view: Vec2, diameter: f32, sections: usize) -> Self {
        let view = view.max(Vec2::ZERO);
        let header_height = (view.y * cfg.height_fraction).max(diameter + cfg.dot_padding);
        let section_width = (diameter + cfg.dot_padding).max(view.x / 4.0);
        let content_width = if sections == 0 {
            0.0
        } else {
            cfg.inset * 2.0
                + sections as f32 * section_width
                + (sections - 1) as f32 * cfg.spacing
        };
        let content_origin = if content_width < view.x {
            (view.x - content_width) * 0.5
        } else {
            0.0
        };
        Self {
            view,
            header_height,
            section_width,
            inset: cfg.inset,
            spacing: cfg.spacing,
            content_width,
            content_origin,
        }
    }

    /// Left edge of section `index` in content space (before scrolling).
    pub fn section_x(&self, index: usize) -> f32 {
        self.content_origin + self.inset + index as f32 * (self.section_width + self.spacing)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_width - self.view.x).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionChange {
    pub index: usize,
    pub previous: usize,
    pub direction: TransitionDirection,
}

pub struct SectionStrip {
    sections: Vec<Section>,
    focused: Option<usize>,
    cfg: HeaderConfig,
    diameter: f32,
    layout: StripLayout,
    scroll: f32,
}

impl SectionStrip {
    pub fn new(specs: Vec<SectionSpec>, cfg: HeaderConfig, diameter: f32, view: Vec2) -> Self {
        let sections: Vec<Section> = specs
            .into_iter()
            .enumerate()
            .map(|(index, s)| Section {
                index,
                title: s.title,
                color: s.color,
                focused: index == 0,
                dot: RepresentativeDot::new(s.color),
            })
            .collect();
        let focused = if sections.is_empty() { None } else { Some(0) };
        let layout = StripLayout::compute(&cfg, view, diameter, sections.len());
        Self {
            sections,
            focused,
            cfg,
            diameter,
            layout,
            scroll: 0.0,
        }
    }

    /// Focus `index`. `None` if it is already focused or does not exist. Moving to a later
    /// section pages `Left`; moving back pages `Right`.
    pub fn select_section(&mut self, index: usize) -> Option<SectionChange> {
        let previous = self.focused?;
        if index == previous || index >= self.sections.len() {
            return None;
        }
        self.sections[previous].focused = false;
        self.sections[index].focused = true;
        self.focused = Some(index);
        self.scroll_to_visible(index);
        let direction = if index > previous {
            TransitionDirection::Left
        } else {
            TransitionDirection::Right
        };
        Some(SectionChange {
            index,
            previous,
            direction,
        })
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.cfg
    }

    pub fn layout(&self) -> &StripLayout {
        &self.layout
    }

    /// Record `color` as the section's pick and animate its dot over to it.
    pub fn swap_color(&mut self, index: usize, color: Color) {
        let duration = self.cfg.dot_fade_duration;
        if let Some(section) = self.sections.get_mut(index) {
            section.color = color;
            section.dot.swap_color(color, duration);
        }
    }

    pub fn relayout(&mut self, view: Vec2) {
        self.layout = StripLayout::compute(&self.cfg, view, self.diameter, self.sections.len());
        self.scroll = self.scroll.clamp(0.0, self.layout.max_scroll());
        if let Some(index) = self.focused {
            self.scroll_to_visible(index);
        }
    }

    /// Replace tuning (hot reload) and recompute the layout.
    pub fn set_config(&mut self, cfg: HeaderConfig) {
        self.cfg = cfg;
        let view = self.layout.view;
        self.relayout(view);
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    /// Smallest scroll change that brings section `index` (with its inset) fully into view.
    pub fn scroll_to_visible(&mut self, index: usize) {
        if index >= self.sections.len() {
            return;
        }
        let left = self.layout.section_x(index) - self.layout.inset;
        let right = self.layout.section_x(index) + self.layout.section_width + self.layout.inset;
        if left < self.scroll {
            self.scroll = left;
        } else if right > self.scroll + self.layout.view.x {
            self.scroll = right - self.layout.view.x;
        }
        self.scroll = self.scroll.clamp(0.0, self.layout.max_scroll());
    }

    /// Centre of section `index`'s dot in content space.
    pub fn dot_center(&self, index: usize) -> Vec2 {
        Vec2::new(
            self.layout.section_x(index) + self.layout.section_width * 0.5,
            self.cfg.label_height + self.cfg.dot_gap + self.diameter * 0.5,
        )
    }

    pub fn dot_diameter(&self) -> f32 {
        self.diameter
    }

    /// Diameter of the focus ring drawn around the focused dot.
    pub fn ring_diameter(&self) -> f32 {
        self.diameter * self.cfg.ring_scale
    }

    pub fn height(&self) -> f32 {
        self.layout.header_height
    }

    pub fn advance(&mut self, dt: f32) {
        for section in &mut self.sections {
            section.dot.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(n: usize, view: Vec2) -> SectionStrip {
        let specs = (0..n)
            .map(|i| SectionSpec {
                title: format!("s{i}"),
                color: Color::srgb(0.1 * i as f32, 0.5, 0.5),
            })
            .collect();
        SectionStrip::new(specs, HeaderConfig::default(), 50.0, view)
    }

    #[test]
    fn first_section_focused_and_reselect_is_noop() {
        let mut s = strip(3, Vec2::new(400.0, 800.0));
        assert_eq!(s.focused(), Some(0));
        assert!(s.select_section(0).is_none());
        assert!(s.select_section(7).is_none());
        assert_eq!(s.sections().iter().filter(|x| x.focused).count(), 1);
    }

    #[test]
    fn empty_strip_never_changes() {
        let mut s = strip(0, Vec2::new(400.0, 800.0));
        assert_eq!(s.focused(), None);
        assert!(s.select_section(0).is_none());
    }

    #[test]
    fn direction_follows_index_order() {
        let mut s = strip(3, Vec2::new(400.0, 800.0));
        let cfg = HeaderConfig::default();
        let c = s.select_section(2).unwrap();
        assert_eq!((c.previous, c.direction), (0, TransitionDirection::Left));
        assert_eq!(s.sections()[0].alpha(&cfg), cfg.dimmed_alpha);
        assert_eq!(s.sections()[2].alpha(&cfg), 1.0);
        let c = s.select_section(1).unwrap();
        assert_eq!(c.direction, TransitionDirection::Right);
    }

    #[test]
    fn layout_centres_narrow_content_and_sizes_header() {
        let s = strip(2, Vec2::new(800.0, 1000.0));
        let l = s.layout();
        assert_eq!(l.section_width, 200.0);
        assert_eq!(l.header_height, 150.0);
        assert_eq!(l.content_width, 15.0 * 2.0 + 400.0 + 10.0);
        assert_eq!(l.content_origin, (800.0 - l.content_width) / 2.0);
        assert_eq!(l.max_scroll(), 0.0);
        // Short views still fit the dot.
        let s = strip(2, Vec2::new(800.0, 100.0));
        assert_eq!(s.height(), 70.0);
    }

    #[test]
    fn scrolls_minimally_to_reveal_focus() {
        let mut s = strip(8, Vec2::new(400.0, 800.0));
        let max = s.layout().max_scroll();
        assert!(max > 0.0);
        s.select_section(7);
        assert_eq!(s.scroll_offset(), max);
        s.select_section(6);
        assert_eq!(s.scroll_offset(), max);
        s.select_section(0);
        assert_eq!(s.scroll_offset(), 0.0);
    }

    #[test]
    fn dot_swap_fades_then_recolours() {
        let mut s = strip(2, Vec2::new(400.0, 800.0));
        let red = Color::srgb(1.0, 0.0, 0.0);
        s.swap_color(1, red);
        assert_eq!(s.sections()[1].color, red);
        assert!(s.sections()[1].dot.is_fading());
        s.advance(0.15);
        assert!(s.sections()[1].dot.opacity() < 1.0);
        s.advance(0.2);
        let dot = &s.sections()[1].dot;
        assert!(!dot.is_fading());
        assert_eq!(dot.color(), red);
        assert_eq!((dot.scale(), dot.opacity()), (1.0, 1.0));
    }

    #[test]
    fn plain_fade_restores_scale_only() {
        let mut dot = RepresentativeDot::new(Color::WHITE);
        dot.fade_out(0.3);
        dot.advance(0.4);
        assert_eq!(dot.scale(), 1.0);
        assert_eq!(dot.opacity(), 0.0);
        dot.replace_color(Color::BLACK);
        assert_eq!(dot.opacity(), 1.0);
    }
}

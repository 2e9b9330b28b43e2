use bevy::prelude::*;

use crate::core::config::PickerConfig;
use crate::core::palette::{
    same_color, ColorSelected, ColorSink, PaletteSource, FALLBACK_COLOR,
};
use crate::gameplay::bubble::{Bubble, BubbleStyle};
use crate::gameplay::bubble_field::{BubbleField, TransitionDirection, TransitionTiming};
use crate::gameplay::header::{SectionChange, SectionSpec, SectionStrip};

/// The whole picker: header strip on top, bubble field below, wired to an injected data
/// provider and event sink.
///
/// Field space has its origin at the bottom-left of the bubble field (y up). World space is the
/// Bevy 2D camera space of a view centred on the origin.
#[derive(Resource)]
pub struct ColorPicker {
    palette: Box<dyn PaletteSource>,
    sink: Box<dyn ColorSink>,
    strip: SectionStrip,
    field: BubbleField,
    style: BubbleStyle,
    diameter: f32,
    view: Vec2,
    started: bool,
}

impl ColorPicker {
    pub fn new(
        palette: Box<dyn PaletteSource>,
        sink: Box<dyn ColorSink>,
        mut field: BubbleField,
        cfg: &PickerConfig,
        view: Vec2,
    ) -> Self {
        let diameter = palette.bubble_diameter();
        let diameter = if diameter.is_finite() { diameter.max(0.0) } else { 0.0 };
        let specs = (0..palette.section_count())
            .map(|s| SectionSpec {
                title: palette.section_title(s).unwrap_or_default(),
                color: palette.default_color(s).unwrap_or(FALLBACK_COLOR),
            })
            .collect();
        let strip = SectionStrip::new(specs, cfg.header.clone(), diameter, view);
        field.set_timing(TransitionTiming::from(&cfg.bubbles));
        let mut picker = Self {
            palette,
            sink,
            strip,
            field,
            style: BubbleStyle::from_config(&cfg.bubbles, &cfg.field),
            diameter,
            view,
            started: false,
        };
        picker.resize(view);
        picker
    }

    /// Populate the focused section (fading in from random sides). Only the first call counts.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if let Some(section) = self.strip.focused() {
            let bubbles = self.build_bubbles(section);
            info!(target: "picker", "start: section {} with {} bubbles", section, bubbles.len());
            self.field
                .transition_to(bubbles, TransitionDirection::All, true);
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Focus a section and page its bubbles in. `None` when nothing changed.
    pub fn select_section(&mut self, index: usize) -> Option<SectionChange> {
        let change = self.strip.select_section(index)?;
        let bubbles = self.build_bubbles(change.index);
        info!(
            target: "picker",
            "section {} -> {} ({:?}, {} bubbles)",
            change.previous,
            change.index,
            change.direction,
            bubbles.len()
        );
        self.field.transition_to(bubbles, change.direction, true);
        Some(change)
    }

    /// Rebuild the focused section in place. The selection is cleared by the transition and
    /// comes back through the bubble matching the section's representative colour.
    pub fn reload(&mut self) {
        let Some(section) = self.strip.focused() else {
            return;
        };
        let bubbles = self.build_bubbles(section);
        debug!(target: "picker", "reload section {}", section);
        self.field.transition_to(bubbles, TransitionDirection::All, true);
    }

    /// Tap at a field-space point. On a new pick the section's dot is swapped, the sink is
    /// notified and the event is returned for the host to broadcast.
    pub fn handle_tap(&mut self, point: Vec2) -> Option<ColorSelected> {
        let section = self.strip.focused()?;
        let tapped = self.field.handle_tap(point)?;
        self.strip.swap_color(section, tapped.color);
        let event = ColorSelected {
            color: tapped.color,
            section,
        };
        self.sink.color_selected(&event);
        info!(target: "picker", "picked {:?} in section {}", tapped.color.to_srgba(), section);
        Some(event)
    }

    /// Fresh bubbles for `section`; the one matching the representative colour arrives selected.
    pub fn build_bubbles(&self, section: usize) -> Vec<Bubble> {
        let representative = self
            .strip
            .section(section)
            .map(|s| s.color)
            .unwrap_or(FALLBACK_COLOR);
        (0..self.palette.color_count(section))
            .map(|i| {
                let color = self.palette.color_at(section, i).unwrap_or(FALLBACK_COLOR);
                Bubble::new(color, self.diameter * 0.5)
                    .with_style(self.style)
                    .with_selected(same_color(color, representative))
            })
            .collect()
    }

    pub fn resize(&mut self, view: Vec2) {
        self.view = view;
        self.strip.relayout(view);
        let extent = self.field_extent();
        self.field.configure(extent);
    }

    pub fn advance(&mut self, dt: f32) {
        self.field.advance(dt);
        self.strip.advance(dt);
    }

    /// Adopt reloaded tuning. Live bubbles keep their current style; new ones use the new one.
    pub fn apply_config(&mut self, cfg: &PickerConfig) {
        self.style = BubbleStyle::from_config(&cfg.bubbles, &cfg.field);
        self.field.set_timing(TransitionTiming::from(&cfg.bubbles));
        self.field.field_mut().apply_config(&cfg.field);
        self.strip.set_config(cfg.header.clone());
        let view = self.view;
        self.resize(view);
    }

    /// The view minus the header strip.
    pub fn field_extent(&self) -> Vec2 {
        Vec2::new(self.view.x, (self.view.y - self.strip.height()).max(0.0))
    }

    pub fn field_to_world(&self, p: Vec2) -> Vec2 {
        p - self.view * 0.5
    }

    pub fn world_to_field(&self, p: Vec2) -> Vec2 {
        p + self.view * 0.5
    }

    /// True if a world-space point lies over the bubble field rather than the header.
    pub fn is_over_field(&self, world: Vec2) -> bool {
        let p = self.world_to_field(world);
        let extent = self.field_extent();
        p.x >= 0.0 && p.x <= extent.x && p.y >= 0.0 && p.y <= extent.y
    }

    pub fn strip(&self) -> &SectionStrip {
        &self.strip
    }

    pub fn field(&self) -> &BubbleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut BubbleField {
        &mut self.field
    }

    pub fn focused_section(&self) -> Option<usize> {
        self.strip.focused()
    }

    pub fn view(&self) -> Vec2 {
        self.view
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    pub fn style(&self) -> BubbleStyle {
        self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::palette::{PaletteSection, SelectionLog, StaticPalette};
    use crate::physics::field::RadialField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn red() -> Color {
        Color::srgb(1.0, 0.0, 0.0)
    }

    fn picker(log: &SelectionLog) -> ColorPicker {
        let palette = StaticPalette::new(
            40.0,
            vec![
                PaletteSection {
                    title: "Walls".into(),
                    default: red(),
                    colors: vec![Color::srgb(0.0, 1.0, 0.0), red(), Color::srgb(0.0, 0.0, 1.0)],
                },
                PaletteSection {
                    title: "Trim".into(),
                    default: Color::WHITE,
                    colors: vec![Color::BLACK, Color::srgb(0.5, 0.5, 0.5)],
                },
            ],
        );
        let field = BubbleField::new(
            Box::new(RadialField::default()),
            Box::new(StdRng::seed_from_u64(3)),
        );
        ColorPicker::new(
            Box::new(palette),
            Box::new(log.clone()),
            field,
            &PickerConfig::default(),
            Vec2::new(400.0, 800.0),
        )
    }

    #[test]
    fn start_preselects_representative_colour() {
        let log = SelectionLog::new();
        let mut p = picker(&log);
        p.start();
        p.start();
        let field = p.field();
        assert_eq!(field.live().len(), 3);
        let selected = field.selected_bubble().map(|b| b.color());
        assert_eq!(selected, Some(red()));
        assert!(log.is_empty());
    }

    #[test]
    fn field_sits_below_header() {
        let log = SelectionLog::new();
        let p = picker(&log);
        assert_eq!(p.field_extent(), Vec2::new(400.0, 800.0 - p.strip().height()));
        assert!(p.is_over_field(Vec2::new(0.0, -390.0)));
        assert!(!p.is_over_field(Vec2::new(0.0, 395.0)));
        let w = Vec2::new(12.0, -30.0);
        assert_eq!(p.field_to_world(p.world_to_field(w)), w);
    }

    #[test]
    fn tap_updates_dot_and_notifies_once() {
        let log = SelectionLog::new();
        let mut p = picker(&log);
        p.start();
        let spread: Vec<_> = p
            .field()
            .live()
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id(), Vec2::new(100.0 + 100.0 * i as f32, 300.0)))
            .collect();
        p.field_mut().sync_positions(spread);
        let target = p.field().live()[0].clone();
        assert!(!target.is_selected());
        let picked = p.handle_tap(target.position());
        assert_eq!(picked.map(|e| e.section), Some(0));
        assert_eq!(log.len(), 1);
        assert!(same_color(p.strip().sections()[0].color, target.color()));
        // Tapping the newly selected bubble again does nothing.
        assert!(p.handle_tap(target.position()).is_none());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn reload_restores_selection_through_representative() {
        let log = SelectionLog::new();
        let mut p = picker(&log);
        p.start();
        p.reload();
        assert_eq!(p.field().selected_bubble().map(|b| b.color()), Some(red()));
        assert_eq!(p.field().departing().len(), 3);
    }

    #[test]
    fn section_change_without_match_has_no_selection() {
        let log = SelectionLog::new();
        let mut p = picker(&log);
        p.start();
        let change = p.select_section(1);
        assert_eq!(change.map(|c| c.direction), Some(TransitionDirection::Left));
        assert_eq!(p.field().live().len(), 2);
        assert!(p.field().selected().is_none());
        assert!(p.select_section(1).is_none());
    }
}

use bubble_picker::core::palette::StaticPalette;
use bubble_picker::core::palette::PaletteSource;
use bubble_picker::PickerConfig;
use std::fs;

#[test]
fn layered_files_merge_with_later_winning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("picker.ron");
    let local = dir.path().join("picker.local.ron");
    fs::write(
        &base,
        r##"(
            window: (title: "Base", width: 300.0),
            bubbles: (selected_scale: 1.5, entry_duration: 1.0),
            palette: (diameter: 40.0, sections: [(title: "Walls", default: "#ff0000", colors: ["#ff0000", "#00ff00"])]),
        )"##,
    )
    .expect("write base");
    fs::write(&local, r#"(window: (title: "Local"), bubbles: (selected_scale: 2.0))"#)
        .expect("write local");

    let (cfg, used, errors) = PickerConfig::load_layered([&base, &local]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 2);
    assert_eq!(cfg.window.title, "Local");
    assert_eq!(cfg.window.width, 300.0);
    assert_eq!(cfg.bubbles.selected_scale, 2.0);
    assert_eq!(cfg.bubbles.entry_duration, 1.0);
    assert_eq!(cfg.bubbles.exit_duration, 0.5);

    let (palette, warnings) = StaticPalette::from_config(&cfg.palette, 0);
    assert!(warnings.is_empty());
    assert_eq!(palette.section_count(), 1);
    assert_eq!(palette.color_count(0), 2);
    assert_eq!(palette.bubble_diameter(), 40.0);
}

#[test]
fn unreadable_and_broken_layers_are_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let broken = dir.path().join("broken.ron");
    fs::write(&broken, "(window: (width: ").expect("write");
    let missing = dir.path().join("missing.ron");

    let (cfg, used, errors) = PickerConfig::load_layered([&broken, &missing]);
    assert!(used.is_empty());
    assert_eq!(errors.len(), 2);
    assert_eq!(cfg, PickerConfig::default());
}

#[test]
fn load_or_default_reports_error() {
    let (cfg, err) = PickerConfig::load_or_default("definitely/not/here.ron");
    assert_eq!(cfg, PickerConfig::default());
    assert!(err.is_some());
}

#[test]
fn shipped_config_parses_and_validates() {
    let cfg = PickerConfig::load_from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config/picker.ron"))
        .expect("shipped config");
    assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    assert!(!cfg.palette.sections.is_empty());
}

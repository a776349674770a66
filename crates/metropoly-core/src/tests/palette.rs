use super::fixtures_root;
use crate::palette::{FALLBACK_COLOR, contrasting_text_color};
use crate::*;

#[test]
fn html_palette_overrides_builtin_colors() {
    let palette = Palette::load(fixtures_root().join("palette").join("palette.html")).unwrap();
    assert_eq!(palette.background(), "#fafafa");
    assert_eq!(palette.get("red"), Some("#d32f2f"));
    assert_eq!(palette.get("brown"), Some("rgb(121, 85, 72)"));
    assert_eq!(palette.get("lightBlue"), Some("lightblue"));
    // Not in the file: still served from the built-in palette.
    assert!(palette.get("chineseRed").is_some());
}

#[test]
fn non_color_declarations_are_skipped() {
    let palette = Palette::from_html(
        "<style>:root { --shadow: var(--borderBlack); --teal: #00897b; }</style>",
    )
    .unwrap();
    assert_eq!(palette.len(), 1);
    assert_eq!(palette.get("shadow"), None);
    assert_eq!(palette.get("teal"), Some("#00897b"));
}

#[test]
fn declarations_outside_style_elements_are_ignored() {
    let palette =
        Palette::from_html(r#"<div style="--red: #000000;"></div><p>--blue: #ffffff;</p>"#)
            .unwrap();
    assert!(palette.is_empty());
}

#[test]
fn unknown_color_resolves_to_fallback() {
    let palette = Palette::builtin();
    assert_eq!(palette.resolve("ultraviolet"), FALLBACK_COLOR);
    assert_eq!(palette.resolve("blue"), "#1e88e5");
}

#[test]
fn text_color_contrasts_with_band_color() {
    assert_eq!(contrasting_text_color("#fdd835"), "black");
    assert_eq!(contrasting_text_color("#283593"), "white");
    assert_eq!(contrasting_text_color("not-a-color"), "black");
}

use super::{AssetRenderOptions, fmt, open_svg, push_text};
use metropoly_core::palette::contrasting_text_color;
use metropoly_core::property::format_amount;
use metropoly_core::{Palette, PropertyRecord};
use std::fmt::Write as _;
use unicode_width::UnicodeWidthStr;

/// Average advance of a glyph relative to the font size, for bold sans-serif faces.
const GLYPH_ADVANCE: f64 = 0.68;

/// Largest font size (up to `base`, down to `min`) at which `text` fits in `available` pixels.
pub fn fit_font_size(text: &str, base: f64, available: f64, min: f64) -> f64 {
    let columns = UnicodeWidthStr::width(text) as f64;
    if columns == 0.0 {
        return base;
    }
    let needed = columns * base * GLYPH_ADVANCE;
    if needed <= available {
        base
    } else {
        (base * available / needed).max(min)
    }
}

/// Square board tile: color band with the upper-cased name, price at the bottom.
pub fn render_tile_svg(
    record: &PropertyRecord,
    palette: &Palette,
    options: &AssetRenderOptions,
) -> String {
    let size = options.pixels.cell_size;
    let k = size / 150.0;
    let background = palette.background();
    let band = palette.resolve(&record.color_key);

    let mut out = String::new();
    open_svg(&mut out, size, size, options);
    push_frame(&mut out, size, background, palette.border(), k);
    let _ = writeln!(
        &mut out,
        r#"<rect class="color-band" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        fmt(size),
        fmt(30.0 * k),
        band
    );

    let name = record.name.to_uppercase();
    let font_size = fit_font_size(&name, 12.0 * k, size - 12.0 * k, 6.0 * k);
    push_text(
        &mut out,
        size / 2.0,
        20.0 * k,
        font_size,
        &options.title_font(),
        contrasting_text_color(band),
        &name,
    );
    push_text(
        &mut out,
        size / 2.0,
        130.0 * k,
        14.0 * k,
        &options.body_font(),
        contrasting_text_color(background),
        &format!("M{}", format_amount(record.price)),
    );
    out.push_str("</svg>\n");
    out
}

/// Blank tile used for board positions without a property.
pub fn render_null_tile_svg(palette: &Palette, options: &AssetRenderOptions) -> String {
    let size = options.pixels.cell_size;
    let k = size / 150.0;
    let mut out = String::new();
    open_svg(&mut out, size, size, options);
    push_frame(&mut out, size, palette.background(), palette.border(), k);
    out.push_str("</svg>\n");
    out
}

fn push_frame(out: &mut String, size: f64, fill: &str, stroke: &str, k: f64) {
    let _ = writeln!(
        out,
        r#"<rect class="tile-frame" x="0" y="0" width="{s}" height="{s}" fill="{fill}" stroke="{stroke}" stroke-width="{sw}"/>"#,
        s = fmt(size),
        sw = fmt(4.0 * k),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_keep_the_base_font_size() {
        assert_eq!(fit_font_size("GO", 12.0, 138.0, 6.0), 12.0);
        assert_eq!(fit_font_size("", 12.0, 138.0, 6.0), 12.0);
    }

    #[test]
    fn long_names_shrink_but_not_below_the_minimum() {
        let name = "MEDITERRANEAN AVENUE";
        let size = fit_font_size(name, 12.0, 138.0, 6.0);
        assert!(size < 12.0);
        assert!(size >= 6.0);
        assert!(name.len() as f64 * size * GLYPH_ADVANCE <= 138.0 + 1e-9);

        let huge = "X".repeat(500);
        assert_eq!(fit_font_size(&huge, 12.0, 138.0, 6.0), 6.0);
    }

    #[test]
    fn wide_characters_count_double() {
        let narrow = fit_font_size("ABCDEFGHIJKLMNOPQRST", 12.0, 138.0, 1.0);
        let wide = fit_font_size("東京東京東京東京東京東京東京東京東京東京", 12.0, 138.0, 1.0);
        assert!(wide < narrow);
    }
}

//! SVG output: per-property tiles and cards, the null tile, and the board canvas.
//!
//! Everything is written into a `String` with `write!`; callers decide where the markup goes.

mod board;
mod card;
mod font;
mod tile;
mod util;

pub use board::{BoardSvgOptions, render_board_svg};
pub use card::render_card_svg;
pub use font::EmbeddedFont;
pub use tile::{fit_font_size, render_null_tile_svg, render_tile_svg};
pub use util::{escape_xml, escape_xml_into, fmt, fmt_into};

use metropoly_core::PixelSizes;
use std::fmt::Write as _;

pub const TITLE_FONT: &str = "Arial Black";
pub const BODY_FONT: &str = "Arial";

#[derive(Debug, Clone, Default)]
pub struct AssetRenderOptions {
    pub pixels: PixelSizes,
    /// Replaces both font families when present.
    pub font: Option<EmbeddedFont>,
}

impl AssetRenderOptions {
    pub(crate) fn title_font(&self) -> String {
        self.font_family(TITLE_FONT)
    }

    pub(crate) fn body_font(&self) -> String {
        self.font_family(BODY_FONT)
    }

    fn font_family(&self, fallback: &str) -> String {
        match &self.font {
            Some(font) => font.family_list(fallback),
            None => fallback.to_string(),
        }
    }
}

/// Opening `<svg>` tag plus the embedded font style, if any.
pub(crate) fn open_svg(out: &mut String, width: f64, height: f64, options: &AssetRenderOptions) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt(width),
        h = fmt(height)
    );
    out.push('\n');
    if let Some(font) = &options.font {
        let _ = writeln!(out, "<style>{}</style>", font.font_face_rule());
    }
}

/// Centered text line.
pub(crate) fn push_text(
    out: &mut String,
    x: f64,
    y: f64,
    font_size: f64,
    font_family: &str,
    fill: &str,
    text: &str,
) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-size="{}" font-family="{}" fill="{}" text-anchor="middle">"#,
        fmt(x),
        fmt(y),
        fmt(font_size),
        escape_xml(font_family),
        escape_xml(fill)
    );
    escape_xml_into(out, text);
    out.push_str("</text>\n");
}

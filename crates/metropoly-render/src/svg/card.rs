use super::{AssetRenderOptions, fit_font_size, fmt, open_svg, push_text};
use metropoly_core::palette::contrasting_text_color;
use metropoly_core::property::format_amount;
use metropoly_core::{Palette, PropertyRecord};
use std::fmt::Write as _;

/// Title deed card. Coordinates are laid out on a 200x350 grid and scaled to the configured size.
pub fn render_card_svg(
    record: &PropertyRecord,
    palette: &Palette,
    options: &AssetRenderOptions,
) -> String {
    let width = options.pixels.card_width;
    let height = options.pixels.card_height;
    let kx = width / 200.0;
    let ky = height / 350.0;
    let k = kx.min(ky);
    let cx = width / 2.0;

    let background = palette.background();
    let band = palette.resolve(&record.color_key);
    let ink = contrasting_text_color(background);
    let title_font = options.title_font();
    let body_font = options.body_font();

    let mut out = String::new();
    open_svg(&mut out, width, height, options);
    let _ = writeln!(
        &mut out,
        r#"<rect class="card-frame" x="0" y="0" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
        fmt(width),
        fmt(height),
        background,
        palette.border(),
        fmt(4.0 * k)
    );
    let _ = writeln!(
        &mut out,
        r#"<rect class="color-band" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        fmt(width),
        fmt(40.0 * ky),
        band
    );
    push_text(
        &mut out,
        cx,
        25.0 * ky,
        12.0 * k,
        &title_font,
        contrasting_text_color(band),
        "TITLE DEED",
    );

    let name = record.name.to_uppercase();
    let name_size = fit_font_size(&name, 18.0 * k, width - 16.0 * kx, 8.0 * k);
    push_text(&mut out, cx, 80.0 * ky, name_size, &body_font, ink, &name);

    let rent = format_amount(record.base_rent);
    let price = format_amount(record.price);
    let lines = [
        (180.0, 14.0, format!("RENT: ${rent}K")),
        (200.0, 14.0, format!("Price: {price}K")),
        (250.0, 12.0, format!("Mortgage Value: {price}K")),
        (330.0, 10.0, format!("TYPE {}", record.card_type.get())),
    ];
    for (y, size, text) in lines {
        push_text(&mut out, cx, y * ky, size * k, &body_font, ink, &text);
    }
    out.push_str("</svg>\n");
    out
}

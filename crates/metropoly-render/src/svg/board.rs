use super::{escape_xml, fmt};
use crate::model::{BoardLayout, PixelPoint, RingGeometry, RingLayout, TileCell, Traversal};
use crate::ring::to_pixel_coordinate;
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct BoardSvgOptions {
    /// Draw empty positions as outlined rectangles instead of the null tile image.
    pub placeholder_rects: bool,
    /// Canvas fill behind the rings.
    pub background: Option<String>,
}

/// Single canvas with one `<g>` per ring; each tile is an `<image>` rotated about its center.
pub fn render_board_svg(layout: &BoardLayout, options: &BoardSvgOptions) -> String {
    let size = layout.canvas_size();
    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="metropoly-board" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
        s = fmt(size)
    );
    if let Some(bg) = &options.background {
        let _ = writeln!(
            &mut out,
            r#"<rect class="board-background" x="0" y="0" width="{s}" height="{s}" fill="{}"/>"#,
            escape_xml(bg),
            s = fmt(size)
        );
    }

    for ring in &layout.rings {
        let Some(geometry) = layout.geometry(ring.lane) else {
            continue;
        };
        render_ring(&mut out, ring, geometry, options);
    }
    out.push_str("</svg>\n");
    out
}

fn render_ring(out: &mut String, ring: &RingLayout, geometry: &RingGeometry, options: &BoardSvgOptions) {
    let _ = writeln!(
        out,
        r#"<g class="ring ring-{}" data-side="{}">"#,
        ring.lane, ring.side
    );
    let cell = geometry.cell_size;
    for (index, tile) in ring.cells.iter().enumerate() {
        let Some(at) = cell_origin(ring, index, tile, geometry) else {
            continue;
        };
        let class = if tile.is_corner { "tile corner" } else { "tile" };
        if tile.is_placeholder() && options.placeholder_rects {
            let _ = writeln!(
                out,
                r##"<rect class="{class} placeholder" x="{}" y="{}" width="{c}" height="{c}" fill="none" stroke="#9e9e9e"/>"##,
                fmt(at.x),
                fmt(at.y),
                c = fmt(cell)
            );
            continue;
        }
        let _ = writeln!(
            out,
            r#"<image class="{class}" href="{}" x="{}" y="{}" width="{c}" height="{c}" transform="rotate({} {} {})"/>"#,
            escape_xml(&tile.image_path),
            fmt(at.x),
            fmt(at.y),
            tile.rotation.degrees(),
            fmt(at.x + cell / 2.0),
            fmt(at.y + cell / 2.0),
            c = fmt(cell)
        );
    }
    out.push_str("</g>\n");
}

fn cell_origin(
    ring: &RingLayout,
    index: usize,
    tile: &TileCell,
    geometry: &RingGeometry,
) -> Option<PixelPoint> {
    match ring.traversal {
        Traversal::Pixel => to_pixel_coordinate(
            u32::try_from(index).ok()?,
            ring.side,
            geometry.cell_size,
            geometry.offset_cells,
        ),
        Traversal::Table => Some(PixelPoint {
            x: (f64::from(tile.grid.col) + geometry.offset_cells) * geometry.cell_size,
            y: (f64::from(tile.grid.row) + geometry.offset_cells) * geometry.cell_size,
        }),
    }
}

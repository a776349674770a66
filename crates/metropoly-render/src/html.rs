//! Board as nested HTML tables: blue contains yellow contains red, each inner table sitting in one
//! `colspan`/`rowspan` cell that covers its container's interior.

use crate::model::{BoardLayout, RingLayout, TileCell};
use htmlize::{escape_attribute, escape_text};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct HtmlRenderOptions {
    pub title: String,
    /// Pixel size of every tile image.
    pub cell_size: f64,
}

impl Default for HtmlRenderOptions {
    fn default() -> Self {
        Self {
            title: "Metropoly Board".to_string(),
            cell_size: 150.0,
        }
    }
}

pub fn render_board_html(layout: &BoardLayout, options: &HtmlRenderOptions) -> String {
    let mut inner: Option<String> = None;
    for ring in layout.rings.iter().rev() {
        inner = Some(render_ring_table(ring, inner.as_deref()));
    }

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>
{style}</style>
</head>
<body>
<div class="board-container">
"#,
        title = escape_text(options.title.as_str()),
        style = board_style(options.cell_size),
    );
    if let Some(table) = inner {
        out.push_str(&table);
        out.push('\n');
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn board_style(cell_size: f64) -> String {
    let mut out = String::new();
    out.push_str(
        ".board-container { display: flex; justify-content: center; align-items: center; margin: 1rem; }\n",
    );
    out.push_str("table.board-ring { border-collapse: collapse; }\n");
    out.push_str("table.board-ring td { padding: 0; border: 1px solid #010101; }\n");
    let _ = writeln!(
        &mut out,
        "img.tile-image {{ display: block; width: {s}px; height: {s}px; }}",
        s = crate::svg::fmt(cell_size)
    );
    for deg in [0, 90, 180, 270] {
        let _ = writeln!(
            &mut out,
            ".tile-image.rot-{deg} {{ transform: rotate({deg}deg); }}"
        );
    }
    out.push_str(".tile-image.corner { outline: 2px solid #010101; outline-offset: -2px; }\n");
    out
}

fn render_tile_cell(out: &mut String, cell: &TileCell) {
    let alt = cell.name.as_deref().unwrap_or("Empty");
    let _ = write!(
        out,
        r#"<td><img src="{src}" alt="{alt}" class="tile-image rot-{rot} lane-{lane}{corner}"/></td>"#,
        src = escape_attribute(cell.image_path.as_str()),
        alt = escape_attribute(alt),
        rot = cell.rotation.degrees(),
        lane = cell.lane,
        corner = if cell.is_corner { " corner" } else { "" },
    );
}

/// One ring as a `<table>`. With `inner`, the interior is a single cell holding it; without, the
/// interior is filled with empty cells.
pub fn render_ring_table(ring: &RingLayout, inner: Option<&str>) -> String {
    let side = ring.side as usize;
    let mut grid: Vec<Option<&TileCell>> = vec![None; side * side];
    for cell in &ring.cells {
        let (row, col) = (cell.grid.row as usize, cell.grid.col as usize);
        if row < side && col < side {
            grid[row * side + col] = Some(cell);
        }
    }
    let at = |row: usize, col: usize| grid[row * side + col];

    let mut out = String::new();
    let _ = writeln!(&mut out, r#"<table class="board-ring ring-{}">"#, ring.lane);
    let last = side.saturating_sub(1);
    for row in 0..side {
        out.push_str("<tr>");
        if row == 0 || row == last {
            for col in 0..side {
                push_cell(&mut out, at(row, col));
            }
        } else {
            push_cell(&mut out, at(row, 0));
            match inner {
                Some(inner) if row == 1 => {
                    let span = side - 2;
                    let _ = write!(
                        &mut out,
                        r#"<td colspan="{span}" rowspan="{span}" class="inner-ring-container">"#
                    );
                    out.push('\n');
                    out.push_str(inner);
                    out.push_str("</td>");
                }
                Some(_) => {}
                None => {
                    for _ in 1..last {
                        out.push_str("<td></td>");
                    }
                }
            }
            push_cell(&mut out, at(row, last));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>");
    out
}

fn push_cell(out: &mut String, cell: Option<&TileCell>) {
    match cell {
        Some(cell) => render_tile_cell(out, cell),
        None => out.push_str("<td></td>"),
    }
}

use metropoly_core::{BoardConfig, BoardManifest, Lane, PropertyStore};
use metropoly_render::html::{HtmlRenderOptions, render_board_html};
use metropoly_render::model::Traversal;
use metropoly_render::svg::{BoardSvgOptions, render_board_svg};
use metropoly_render::{LayoutOptions, layout_board};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn store_and_manifest() -> (PropertyStore, BoardManifest) {
    let fixtures = workspace_root().join("fixtures");
    let store = PropertyStore::load(fixtures.join("properties").join("basic.json")).expect("store");
    let manifest =
        BoardManifest::load(fixtures.join("config").join("manifest.json")).expect("manifest");
    (store, manifest)
}

#[test]
fn html_board_nests_rings_in_center_cells() {
    let (store, manifest) = store_and_manifest();
    let layout = layout_board(
        &manifest,
        &store,
        &BoardConfig::default(),
        &LayoutOptions::default(),
    );
    let html = render_board_html(&layout, &HtmlRenderOptions::default());

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches("<table").count(), 3);
    assert_eq!(html.matches("</table>").count(), 3);
    assert_eq!(html.matches("<img ").count(), 64 + 60 + 56);
    assert!(html.contains(r#"<td colspan="15" rowspan="15" class="inner-ring-container">"#));
    assert!(html.contains(r#"<td colspan="14" rowspan="14" class="inner-ring-container">"#));
    assert!(html.contains(r#"class="board-ring ring-red""#));
    assert!(html.contains(
        r#"<img src="../casillas/casilla_GO.svg" alt="GO" class="tile-image rot-270 lane-blue corner"/>"#
    ));
    assert!(html.contains(r#"alt="Empty""#));
    assert!(html.contains(".tile-image.rot-90 { transform: rotate(90deg); }"));

    let blue_start = html.find("ring-blue").unwrap();
    let yellow_start = html.find("ring-yellow").unwrap();
    let red_start = html.find("ring-red").unwrap();
    assert!(blue_start < yellow_start && yellow_start < red_start);
}

#[test]
fn html_escapes_names() {
    let json = r#"[{"name": "Fish & <Chips>", "color": "red", "lane": "red", "price": 1, "rent": 1}]"#;
    let store = PropertyStore::from_json_str(json).unwrap();
    let layout = layout_board(
        &BoardManifest::from_store(&store),
        &store,
        &BoardConfig::default(),
        &LayoutOptions::default(),
    );
    let html = render_board_html(&layout, &HtmlRenderOptions::default());
    assert!(html.contains("alt=\"Fish &amp; &lt;Chips&gt;\""));
    assert!(!html.contains("<Chips>"));
}

#[test]
fn svg_board_is_well_formed_and_places_tiles_from_the_top_left() {
    let (store, manifest) = store_and_manifest();
    let layout = layout_board(
        &manifest,
        &store,
        &BoardConfig::default(),
        &LayoutOptions::default().with_traversal(Traversal::Pixel),
    );
    let svg = render_board_svg(&layout, &BoardSvgOptions::default());
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "svg");
    assert_eq!(root.attribute("width"), Some("2550"));

    let groups: Vec<_> = root
        .children()
        .filter(|n| n.has_tag_name("g"))
        .map(|n| n.attribute("class").unwrap_or_default().to_string())
        .collect();
    assert_eq!(groups, vec!["ring ring-blue", "ring ring-yellow", "ring ring-red"]);

    let images: Vec<_> = doc
        .descendants()
        .filter(|n| n.has_tag_name("image"))
        .collect();
    assert_eq!(images.len(), 64 + 60 + 56);

    let first = images[0];
    assert_eq!(first.attribute("href"), Some("../casillas/casilla_GO.svg"));
    assert_eq!(first.attribute("x"), Some("0"));
    assert_eq!(first.attribute("y"), Some("0"));
    assert_eq!(first.attribute("class"), Some("tile corner"));
    assert_eq!(first.attribute("transform"), Some("rotate(0 75 75)"));

    let second = images[1];
    assert_eq!(
        second.attribute("href"),
        Some("../casillas/casilla_Baltic Avenue.svg")
    );
    assert_eq!(second.attribute("x"), Some("150"));
    assert_eq!(second.attribute("y"), Some("0"));

    // First yellow tile sits one blue cell in from the canvas corner.
    let yellow_first = images[64];
    assert_eq!(yellow_first.attribute("x"), Some("150"));
    assert_eq!(yellow_first.attribute("width"), Some("140.625"));
}

#[test]
fn placeholder_only_board_renders_every_position() {
    let layout = layout_board(
        &BoardManifest::default(),
        &PropertyStore::default(),
        &BoardConfig::default(),
        &LayoutOptions::default().with_traversal(Traversal::Pixel),
    );
    let options = BoardSvgOptions {
        placeholder_rects: true,
        background: Some("#fafafa".to_string()),
    };
    let svg = render_board_svg(&layout, &options);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");
    let placeholders = doc
        .descendants()
        .filter(|n| n.has_tag_name("rect"))
        .filter(|n| {
            n.attribute("class")
                .is_some_and(|c| c.split(' ').any(|p| p == "placeholder"))
        })
        .count();
    assert_eq!(placeholders, 64 + 60 + 56);
    assert_eq!(doc.descendants().filter(|n| n.has_tag_name("image")).count(), 0);

    let html = render_board_html(&layout, &HtmlRenderOptions::default());
    assert_eq!(html.matches(r#"src="../casillas/casilla_NULL.svg""#).count(), 180);
}

#[test]
fn omitted_rings_drop_out_of_both_renderers() {
    let (store, manifest) = store_and_manifest();
    let config = BoardConfig {
        sizing: metropoly_core::SizingPolicy::Fit,
        ..BoardConfig::default()
    };
    let layout = layout_board(&manifest, &store, &config, &LayoutOptions::default());
    assert!(layout.ring(Lane::Yellow).is_none());

    let html = render_board_html(&layout, &HtmlRenderOptions::default());
    assert_eq!(html.matches("<table").count(), 1);
    // Side-3 ring with no inner ring: one empty interior cell.
    assert!(html.contains("<td></td>"));

    let svg = render_board_svg(&layout, &BoardSvgOptions::default());
    roxmltree::Document::parse(&svg).expect("well-formed svg");
    assert!(svg.contains(r#"width="450""#));
}

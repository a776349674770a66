//! Square-ring geometry: side lengths, perimeter walks, corner detection, tile facing, and
//! pixel placement.
//!
//! A ring of side `n` is the border of an `n x n` grid and holds `4 * n - 4` tiles. Rows grow
//! downwards and columns to the right, so `(0, 0)` is the top-left corner.

use crate::catalog::TileCatalog;
use crate::model::{GridPos, PixelPoint, RingLayout, Rotation, TileCell, Traversal};
use metropoly_core::{FileNaming, Lane, LaneNames, PropertyStore, SizingPolicy};

/// Smallest ring that still has an interior edge tile on every side.
pub const MIN_SIDE: u32 = 3;

pub const fn perimeter(side: u32) -> u32 {
    if side < 2 { side } else { side.saturating_mul(4) - 4 }
}

/// Inverse of [`perimeter`] for canonical perimeters (`64 -> 17`). Perimeters below 4 map to 2,
/// which is below [`MIN_SIDE`] and therefore never drawn.
pub fn side_length_from_perimeter(perimeter: u32) -> u32 {
    if perimeter < 4 {
        return 2;
    }
    perimeter / 4 + 1
}

/// Smallest side `n >= 3` with `4 * n - 4 >= tile_count`. Counts below 4 count as 4.
pub fn side_length_for_fit(tile_count: usize) -> u32 {
    let count = tile_count.max(4);
    let side = (count + 4).div_ceil(4).max(MIN_SIDE as usize);
    u32::try_from(side).unwrap_or(u32::MAX)
}

/// `count` is a perimeter under [`SizingPolicy::Fixed`] and [`SizingPolicy::Nested`], and a
/// tile count under [`SizingPolicy::Fit`].
pub fn compute_side_length(count: u32, policy: SizingPolicy) -> u32 {
    match policy {
        SizingPolicy::Fixed | SizingPolicy::Nested => side_length_from_perimeter(count),
        SizingPolicy::Fit => side_length_for_fit(count as usize),
    }
}

/// Sides of `count` concentric rings starting at `outer_side`, each `step` smaller than the
/// last. Stops at the first ring below [`MIN_SIDE`].
pub fn nest_rings(outer_side: u32, count: usize, step: u32) -> Vec<u32> {
    let step = step.max(1);
    let mut out = Vec::with_capacity(count);
    let mut side = outer_side;
    for _ in 0..count {
        if side < MIN_SIDE {
            break;
        }
        out.push(side);
        side = side.saturating_sub(step);
    }
    out
}

/// Forces each requested side to be at least `step` smaller than the ring containing it.
/// Once a ring drops below [`MIN_SIDE`] it and every ring inside it become `None`.
pub fn clamp_nested_sides(requested: &[u32], step: u32) -> Vec<Option<u32>> {
    let step = step.max(1);
    let mut out = Vec::with_capacity(requested.len());
    let mut container: Option<u32> = None;
    let mut broken = false;
    for &side in requested {
        if broken {
            out.push(None);
            continue;
        }
        let side = match container {
            Some(outer) => side.min(outer.saturating_sub(step)),
            None => side,
        };
        if side < MIN_SIDE {
            broken = true;
            out.push(None);
            continue;
        }
        container = Some(side);
        out.push(Some(side));
    }
    out
}

/// Table-order walk: bottom-left corner, along the bottom row to the right, up the right column,
/// back along the top row, and down the left column. Every border cell appears exactly once.
pub fn enumerate_perimeter(side: u32) -> Vec<GridPos> {
    if side < 2 {
        return if side == 1 {
            vec![GridPos::new(0, 0)]
        } else {
            Vec::new()
        };
    }
    let last = side - 1;
    let mut out = Vec::with_capacity(perimeter(side) as usize);
    out.extend((0..side).map(|col| GridPos::new(last, col)));
    out.extend((0..last).rev().map(|row| GridPos::new(row, last)));
    out.extend((0..last).rev().map(|col| GridPos::new(0, col)));
    out.extend((1..last).map(|row| GridPos::new(row, 0)));
    out
}

/// Grid cell of pixel-order index `index`: top-left corner, along the top row to the right, down
/// the right column, back along the bottom row, and up the left column.
pub fn pixel_grid_position(index: u32, side: u32) -> Option<GridPos> {
    if side < 2 || index >= perimeter(side) {
        return None;
    }
    let last = side - 1;
    let pos = if index < side {
        GridPos::new(0, index)
    } else if index < 2 * side - 1 {
        GridPos::new(index - last, last)
    } else if index < 3 * side - 2 {
        GridPos::new(last, last - (index - (2 * side - 2)))
    } else {
        GridPos::new(last - (index - (3 * side - 3)), 0)
    };
    Some(pos)
}

pub fn enumerate_pixel_perimeter(side: u32) -> Vec<GridPos> {
    (0..perimeter(side))
        .filter_map(|idx| pixel_grid_position(idx, side))
        .collect()
}

pub fn enumerate(traversal: Traversal, side: u32) -> Vec<GridPos> {
    match traversal {
        Traversal::Table => enumerate_perimeter(side),
        Traversal::Pixel => enumerate_pixel_perimeter(side),
    }
}

/// Top-left pixel of the cell at pixel-order `index`, shifted by `ring_offset` cells on both axes.
pub fn to_pixel_coordinate(
    index: u32,
    side: u32,
    cell_size: f64,
    ring_offset: f64,
) -> Option<PixelPoint> {
    let pos = pixel_grid_position(index, side)?;
    Some(PixelPoint {
        x: (f64::from(pos.col) + ring_offset) * cell_size,
        y: (f64::from(pos.row) + ring_offset) * cell_size,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    Edge(Edge),
    Corner(Corner),
}

impl Placement {
    /// Facing lookup. Edges face the interior; each corner takes the rotation of the edge that
    /// leaves it clockwise.
    pub const fn rotation(self) -> Rotation {
        match self {
            Placement::Edge(Edge::Top) => Rotation::Deg0,
            Placement::Edge(Edge::Right) => Rotation::Deg90,
            Placement::Edge(Edge::Bottom) => Rotation::Deg180,
            Placement::Edge(Edge::Left) => Rotation::Deg270,
            Placement::Corner(Corner::TopLeft) => Rotation::Deg0,
            Placement::Corner(Corner::TopRight) => Rotation::Deg90,
            Placement::Corner(Corner::BottomRight) => Rotation::Deg180,
            Placement::Corner(Corner::BottomLeft) => Rotation::Deg270,
        }
    }

    pub const fn is_corner(self) -> bool {
        matches!(self, Placement::Corner(_))
    }
}

/// `None` for interior cells and cells outside the grid.
pub fn classify_position(pos: GridPos, side: u32) -> Option<Placement> {
    if side == 0 || pos.row >= side || pos.col >= side {
        return None;
    }
    let last = side - 1;
    let top = pos.row == 0;
    let bottom = pos.row == last;
    let left = pos.col == 0;
    let right = pos.col == last;
    let placement = match (top, right, bottom, left) {
        (true, _, _, true) => Placement::Corner(Corner::TopLeft),
        (true, true, _, _) => Placement::Corner(Corner::TopRight),
        (_, true, true, _) => Placement::Corner(Corner::BottomRight),
        (_, _, true, true) => Placement::Corner(Corner::BottomLeft),
        (true, _, _, _) => Placement::Edge(Edge::Top),
        (_, true, _, _) => Placement::Edge(Edge::Right),
        (_, _, true, _) => Placement::Edge(Edge::Bottom),
        (_, _, _, true) => Placement::Edge(Edge::Left),
        _ => return None,
    };
    Some(placement)
}

pub fn is_corner(pos: GridPos, side: u32) -> bool {
    classify_position(pos, side).is_some_and(Placement::is_corner)
}

/// Interior cells get [`Rotation::Deg0`].
pub fn compute_rotation(pos: GridPos, side: u32) -> Rotation {
    classify_position(pos, side).map_or(Rotation::Deg0, Placement::rotation)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment<'a> {
    pub pos: GridPos,
    pub is_corner: bool,
    pub name: Option<&'a str>,
}

/// Empty or whitespace-only names mark a deliberately empty slot.
pub fn is_blank_name(name: &str) -> bool {
    name.trim().is_empty()
}

/// Walks `coords` in order: corners take the next corner name, other cells the next lane name.
/// Exhausted lists and blank names leave placeholders; names beyond the available slots are
/// dropped.
pub fn assign_tiles<'a>(
    coords: &[GridPos],
    side: u32,
    lane_names: &'a [String],
    corner_names: &'a [String],
) -> Vec<SlotAssignment<'a>> {
    let mut lane_iter = lane_names.iter().map(String::as_str);
    let mut corner_iter = corner_names.iter().map(String::as_str);
    coords
        .iter()
        .map(|&pos| {
            let is_corner = is_corner(pos, side);
            let name = if is_corner {
                corner_iter.next()
            } else {
                lane_iter.next()
            }
            .filter(|name| !is_blank_name(name));
            SlotAssignment {
                pos,
                is_corner,
                name,
            }
        })
        .collect()
}

/// What happened to a named slot while building a ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotIssue {
    MissingImage { name: String, file: String },
}

/// Where the tiles of a ring come from.
#[derive(Clone, Copy)]
pub struct TileSource<'a> {
    /// Names without a record here become placeholders.
    pub store: &'a PropertyStore,
    pub catalog: &'a dyn TileCatalog,
    pub naming: &'a FileNaming,
}

/// Builds one ring. Returns `None` (no cells) when `side` is below [`MIN_SIDE`].
pub fn build_ring(
    lane: Lane,
    side: u32,
    traversal: Traversal,
    names: &LaneNames,
    tiles: TileSource<'_>,
    issues: &mut Vec<SlotIssue>,
) -> Option<RingLayout> {
    if side < MIN_SIDE {
        return None;
    }

    let naming = tiles.naming;
    let coords = enumerate(traversal, side);
    let null_path = naming.board_image_path(&naming.null_tile_file);
    let cells = assign_tiles(&coords, side, &names.lane, &names.corners)
        .into_iter()
        .map(|slot| {
            // No record means no tile is ever generated for the name.
            let name = slot.name.filter(|name| tiles.store.contains(name));
            let image_path = match name {
                Some(name) => match tiles.catalog.resolve(name) {
                    Some(file) => naming.board_image_path(&file),
                    None => {
                        issues.push(SlotIssue::MissingImage {
                            name: name.to_string(),
                            file: naming.tile_file_name(name),
                        });
                        null_path.clone()
                    }
                },
                None => null_path.clone(),
            };
            TileCell {
                image_path,
                rotation: compute_rotation(slot.pos, side),
                name: name.map(str::to_string),
                lane,
                is_corner: slot.is_corner,
                grid: slot.pos,
            }
        })
        .collect();

    Some(RingLayout {
        lane,
        side,
        traversal,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GeneratedTileCatalog;
    use rustc_hash::FxHashSet;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn canonical_perimeters_map_to_sides() {
        assert_eq!(compute_side_length(64, SizingPolicy::Fixed), 17);
        assert_eq!(compute_side_length(60, SizingPolicy::Fixed), 16);
        assert_eq!(compute_side_length(56, SizingPolicy::Fixed), 15);
        assert_eq!(side_length_from_perimeter(3), 2);
    }

    #[test]
    fn fit_side_is_the_smallest_ring_holding_every_tile() {
        assert_eq!(compute_side_length(40, SizingPolicy::Fit), 11);
        assert_eq!(compute_side_length(41, SizingPolicy::Fit), 12);
        assert_eq!(side_length_for_fit(0), 3);
        assert_eq!(side_length_for_fit(4), 3);
        assert_eq!(side_length_for_fit(8), 3);
        assert_eq!(side_length_for_fit(9), 4);
        for count in 0..200usize {
            let side = side_length_for_fit(count);
            assert!(side >= MIN_SIDE);
            assert!(perimeter(side) as usize >= count);
            if side > MIN_SIDE {
                assert!((perimeter(side - 1) as usize) < count.max(4));
            }
        }
    }

    #[test]
    fn perimeter_walks_are_complete_and_unique() {
        for side in MIN_SIDE..=24 {
            for traversal in [Traversal::Table, Traversal::Pixel] {
                let coords = enumerate(traversal, side);
                assert_eq!(coords.len() as u32, 4 * side - 4);
                let unique: FxHashSet<GridPos> = coords.iter().copied().collect();
                assert_eq!(unique.len(), coords.len());
                assert_eq!(coords.iter().filter(|p| is_corner(**p, side)).count(), 4);
                for p in &coords {
                    assert!(classify_position(*p, side).is_some(), "{p:?} is interior");
                }
            }
        }
    }

    #[test]
    fn table_walk_starts_bottom_left_and_goes_clockwise() {
        let coords = enumerate_perimeter(3);
        let expected = [
            (2, 0),
            (2, 1),
            (2, 2),
            (1, 2),
            (0, 2),
            (0, 1),
            (0, 0),
            (1, 0),
        ];
        let got: Vec<(u32, u32)> = coords.iter().map(|p| (p.row, p.col)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn pixel_walk_starts_top_left_and_goes_clockwise() {
        let got: Vec<(u32, u32)> = enumerate_pixel_perimeter(3)
            .iter()
            .map(|p| (p.row, p.col))
            .collect();
        let expected = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 2),
            (2, 2),
            (2, 1),
            (2, 0),
            (1, 0),
        ];
        assert_eq!(got, expected);
        assert_eq!(pixel_grid_position(8, 3), None);
    }

    #[test]
    fn corners_sit_at_quarter_points_of_both_walks() {
        let side = 17;
        for traversal in [Traversal::Table, Traversal::Pixel] {
            let coords = enumerate(traversal, side);
            let corner_idx: Vec<usize> = coords
                .iter()
                .enumerate()
                .filter(|(_, p)| is_corner(**p, side))
                .map(|(i, _)| i)
                .collect();
            let s = side as usize;
            assert_eq!(corner_idx, vec![0, s - 1, 2 * s - 2, 3 * s - 3]);
        }
    }

    #[test]
    fn rotation_faces_the_interior() {
        let side = 5;
        assert_eq!(compute_rotation(GridPos::new(0, 2), side), Rotation::Deg0);
        assert_eq!(compute_rotation(GridPos::new(2, 4), side), Rotation::Deg90);
        assert_eq!(compute_rotation(GridPos::new(4, 2), side), Rotation::Deg180);
        assert_eq!(compute_rotation(GridPos::new(2, 0), side), Rotation::Deg270);

        assert_eq!(compute_rotation(GridPos::new(0, 0), side), Rotation::Deg0);
        assert_eq!(compute_rotation(GridPos::new(0, 4), side), Rotation::Deg90);
        assert_eq!(compute_rotation(GridPos::new(4, 4), side), Rotation::Deg180);
        assert_eq!(compute_rotation(GridPos::new(4, 0), side), Rotation::Deg270);

        assert_eq!(compute_rotation(GridPos::new(2, 2), side), Rotation::Deg0);
        assert_eq!(classify_position(GridPos::new(2, 2), side), None);
        assert_eq!(classify_position(GridPos::new(5, 0), side), None);
    }

    #[test]
    fn underfull_lane_is_padded_with_placeholders_in_order() {
        // Side 4: 12 positions, 4 corners, 8 regular slots.
        let coords = enumerate_perimeter(4);
        let lane = names("L", 3);
        let slots = assign_tiles(&coords, 4, &lane, &[]);
        let regular: Vec<Option<&str>> = slots
            .iter()
            .filter(|s| !s.is_corner)
            .map(|s| s.name)
            .collect();
        assert_eq!(regular.len(), 8);
        assert_eq!(&regular[..3], &[Some("L0"), Some("L1"), Some("L2")]);
        assert!(regular[3..].iter().all(Option::is_none));
        assert!(slots.iter().filter(|s| s.is_corner).all(|s| s.name.is_none()));
    }

    #[test]
    fn ten_slot_lane_takes_three_names_then_seven_placeholders() {
        // First ten regular cells of a side-5 ring.
        let coords: Vec<GridPos> = enumerate_perimeter(5)
            .into_iter()
            .filter(|p| !is_corner(*p, 5))
            .take(10)
            .collect();
        let three = names("P", 3);
        let slots = assign_tiles(&coords, 5, &three, &[]);
        assert_eq!(slots.iter().filter(|s| s.name.is_some()).count(), 3);
        assert_eq!(slots.iter().filter(|s| s.name.is_none()).count(), 7);
        assert_eq!(slots[2].name, Some("P2"));

        let twelve = names("P", 12);
        let slots = assign_tiles(&coords, 5, &twelve, &[]);
        let used: Vec<&str> = slots.iter().filter_map(|s| s.name).collect();
        assert_eq!(used.len(), 10);
        assert_eq!(used.last(), Some(&"P9"));
    }

    #[test]
    fn surplus_corner_names_are_dropped() {
        let coords = enumerate_perimeter(3);
        let corners = names("C", 6);
        let slots = assign_tiles(&coords, 3, &[], &corners);
        let used: Vec<&str> = slots.iter().filter_map(|s| s.name).collect();
        assert_eq!(used, vec!["C0", "C1", "C2", "C3"]);
    }

    #[test]
    fn nest_rings_steps_down_and_stops_below_three() {
        assert_eq!(nest_rings(17, 3, 1), vec![17, 16, 15]);
        assert_eq!(nest_rings(17, 3, 2), vec![17, 15, 13]);
        assert_eq!(nest_rings(4, 3, 1), vec![4, 3]);
        assert_eq!(nest_rings(2, 3, 1), Vec::<u32>::new());
    }

    #[test]
    fn clamping_keeps_sides_strictly_decreasing() {
        assert_eq!(
            clamp_nested_sides(&[17, 16, 15], 1),
            vec![Some(17), Some(16), Some(15)]
        );
        assert_eq!(
            clamp_nested_sides(&[5, 9, 12], 1),
            vec![Some(5), Some(4), Some(3)]
        );
        assert_eq!(clamp_nested_sides(&[4, 9, 9], 1), vec![Some(4), Some(3), None]);
        assert_eq!(clamp_nested_sides(&[3, 3, 3], 1), vec![Some(3), None, None]);
        assert_eq!(clamp_nested_sides(&[2, 3, 3], 1), vec![None, None, None]);
    }

    #[test]
    fn pixel_coordinates_follow_the_top_left_walk() {
        let p = to_pixel_coordinate(0, 5, 10.0, 0.0).unwrap();
        assert_eq!((p.x, p.y), (0.0, 0.0));
        let p = to_pixel_coordinate(4, 5, 10.0, 0.0).unwrap();
        assert_eq!((p.x, p.y), (40.0, 0.0));
        let p = to_pixel_coordinate(8, 5, 10.0, 0.0).unwrap();
        assert_eq!((p.x, p.y), (40.0, 40.0));
        let p = to_pixel_coordinate(12, 5, 10.0, 1.5).unwrap();
        assert_eq!((p.x, p.y), (15.0, 55.0));
        assert!(to_pixel_coordinate(16, 5, 10.0, 0.0).is_none());
    }

    fn store_of(lane: Lane, names: &[String]) -> PropertyStore {
        PropertyStore::from_records(
            names
                .iter()
                .map(|name| metropoly_core::PropertyRecord {
                    name: name.clone(),
                    color_key: "red".to_string(),
                    lane,
                    image_ref: String::new(),
                    price: 100.0,
                    base_rent: 10.0,
                    card_type: metropoly_core::CardType::default(),
                    position_kind: metropoly_core::PositionKind::Regular,
                    position: None,
                })
                .collect(),
        )
    }

    #[test]
    fn small_rings_produce_no_cells() {
        let naming = FileNaming::default();
        let catalog = GeneratedTileCatalog::new(naming.clone());
        let store = store_of(Lane::Red, &names("R", 4));
        let tiles = TileSource {
            store: &store,
            catalog: &catalog,
            naming: &naming,
        };
        let mut issues = Vec::new();
        let ring = build_ring(
            Lane::Red,
            2,
            Traversal::Table,
            &LaneNames {
                lane: names("R", 4),
                corners: Vec::new(),
            },
            tiles,
            &mut issues,
        );
        assert!(ring.is_none());
        assert!(issues.is_empty());
    }

    #[test]
    fn placeholder_only_ring_still_has_every_position() {
        let naming = FileNaming::default();
        let catalog = GeneratedTileCatalog::new(naming.clone());
        let store = PropertyStore::default();
        let tiles = TileSource {
            store: &store,
            catalog: &catalog,
            naming: &naming,
        };
        let mut issues = Vec::new();
        let ring = build_ring(
            Lane::Blue,
            17,
            Traversal::Table,
            &LaneNames::default(),
            tiles,
            &mut issues,
        )
        .unwrap();
        assert_eq!(ring.cells.len(), 64);
        assert_eq!(ring.filled().count(), 0);
        assert_eq!(ring.corners().count(), 4);
        assert!(
            ring.cells
                .iter()
                .all(|c| c.image_path == "../casillas/casilla_NULL.svg")
        );
    }

    #[test]
    fn perimeter_saturates_instead_of_overflowing() {
        assert_eq!(perimeter(17), 64);
        assert_eq!(perimeter(u32::MAX), u32::MAX - 4);
    }

    #[test]
    fn blank_names_are_empty_slots() {
        let coords = enumerate_perimeter(3);
        let lane = vec![String::new(), "  ".to_string(), "Oriental".to_string()];
        let slots = assign_tiles(&coords, 3, &lane, &[]);
        assert_eq!(slots[1].name, None);
        assert_eq!(slots[3].name, None);
        assert_eq!(slots[5].name, Some("Oriental"));
        assert!(is_blank_name(" \t"));
        assert!(!is_blank_name("GO"));
    }

    #[test]
    fn names_without_a_record_get_the_null_tile() {
        let naming = FileNaming::default();
        let catalog = GeneratedTileCatalog::new(naming.clone());
        let store = store_of(Lane::Red, &["El Colli".to_string()]);
        let tiles = TileSource {
            store: &store,
            catalog: &catalog,
            naming: &naming,
        };
        let mut issues = Vec::new();
        let ring = build_ring(
            Lane::Red,
            3,
            Traversal::Table,
            &LaneNames {
                lane: vec![
                    "El Colli".to_string(),
                    "Nowhere Street".to_string(),
                    String::new(),
                ],
                corners: Vec::new(),
            },
            tiles,
            &mut issues,
        )
        .unwrap();
        assert_eq!(ring.cells[1].name.as_deref(), Some("El Colli"));
        assert_eq!(ring.cells[1].image_path, "../casillas/casilla_El Colli.svg");
        for idx in [3, 5] {
            assert_eq!(ring.cells[idx].name, None);
            assert_eq!(ring.cells[idx].image_path, "../casillas/casilla_NULL.svg");
        }
        assert_eq!(ring.filled().count(), 1);
        assert!(issues.is_empty());
    }
}

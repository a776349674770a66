use crate::LayoutOptions;
use crate::model::{BoardLayout, Diagnostic, DiagnosticKind, RingGeometry, RingLayout};
use crate::ring::{self, SlotIssue};
use metropoly_core::{BoardConfig, BoardManifest, Lane, PropertyStore, SizingPolicy};

/// Side length each lane asks for before the nesting clamp, outer to inner.
pub fn requested_sides(manifest: &BoardManifest, config: &BoardConfig) -> [u32; 3] {
    match config.sizing {
        SizingPolicy::Fixed => Lane::ALL.map(|lane| {
            ring::compute_side_length(config.canonical_perimeters.get(lane), SizingPolicy::Fixed)
        }),
        SizingPolicy::Fit => {
            Lane::ALL.map(|lane| ring::side_length_for_fit(manifest.get(lane).total()))
        }
        SizingPolicy::Nested => {
            let outer = ring::compute_side_length(
                config.canonical_perimeters.get(Lane::Blue),
                SizingPolicy::Nested,
            );
            let sides = ring::nest_rings(outer, Lane::ALL.len(), config.nest_step);
            [0, 1, 2].map(|i| sides.get(i).copied().unwrap_or(0))
        }
    }
}

/// Advisory checks of a manifest against the property data.
///
/// Names are indexed over the lane list followed by the corner list; a declared position is
/// compared with that index. A name is looked up in its own lane first, so a name shared by
/// several lanes is only a mismatch when the lane being checked has no record of it.
pub fn validate_lane_assignments(
    manifest: &BoardManifest,
    store: &PropertyStore,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for lane in Lane::ALL {
        for (index, name) in manifest.get(lane).all().enumerate() {
            if ring::is_blank_name(name) {
                continue;
            }
            let record = match store.get_in_lane(lane, name) {
                Some(record) => record,
                None => {
                    let kind = match store.get(name) {
                        Some(other) => DiagnosticKind::LaneMismatch {
                            declared: other.lane,
                        },
                        None => DiagnosticKind::UnknownProperty,
                    };
                    out.push(Diagnostic {
                        lane,
                        name: name.to_string(),
                        kind,
                    });
                    continue;
                }
            };
            if let Some(declared) = record.position {
                if declared as usize != index {
                    out.push(Diagnostic {
                        lane,
                        name: name.to_string(),
                        kind: DiagnosticKind::PositionMismatch {
                            declared,
                            listed: index,
                        },
                    });
                }
            }
        }
    }
    out
}

/// Places the outer ring at the canvas origin and centers every inner ring inside the interior
/// of the ring containing it, shrinking the cell size when the interior is too small.
pub fn ring_geometry(rings: &[RingLayout], cell_size: f64) -> Vec<RingGeometry> {
    let mut out: Vec<RingGeometry> = Vec::with_capacity(rings.len());
    for ring in rings {
        let side = f64::from(ring.side);
        let geometry = match out.last() {
            None => RingGeometry {
                lane: ring.lane,
                cell_size,
                offset_cells: 0.0,
                extent: side * cell_size,
            },
            Some(parent) => {
                let interior = parent.extent - 2.0 * parent.cell_size;
                let cell = cell_size.min(interior / side);
                let extent = side * cell;
                let origin = parent.origin() + (parent.extent - extent) / 2.0;
                RingGeometry {
                    lane: ring.lane,
                    cell_size: cell,
                    offset_cells: origin / cell,
                    extent,
                }
            }
        };
        out.push(geometry);
    }
    out
}

/// Lays out the three rings of a board.
///
/// Data problems never fail the layout; they are logged and returned as diagnostics.
pub fn layout_board(
    manifest: &BoardManifest,
    store: &PropertyStore,
    config: &BoardConfig,
    options: &LayoutOptions,
) -> BoardLayout {
    let mut diagnostics = validate_lane_assignments(manifest, store);

    let requested = requested_sides(manifest, config);
    let sides = ring::clamp_nested_sides(&requested, config.nest_step);
    tracing::debug!(sizing = ?config.sizing, ?requested, ?sides, "ring sides");

    let tiles = ring::TileSource {
        store,
        catalog: options.tile_catalog.as_ref(),
        naming: &config.files,
    };
    let mut rings = Vec::with_capacity(Lane::ALL.len());
    for (lane, side) in Lane::ALL.into_iter().zip(sides) {
        let Some(side) = side else {
            diagnostics.push(Diagnostic {
                lane,
                name: lane.as_str().to_string(),
                kind: DiagnosticKind::RingOmitted {
                    side: requested[lane.depth()],
                },
            });
            continue;
        };
        let mut issues = Vec::new();
        let built = ring::build_ring(
            lane,
            side,
            options.traversal,
            manifest.get(lane),
            tiles,
            &mut issues,
        );
        diagnostics.extend(issues.into_iter().map(|issue| match issue {
            SlotIssue::MissingImage { name, file } => Diagnostic {
                lane,
                name,
                kind: DiagnosticKind::MissingTileImage { file },
            },
        }));
        rings.extend(built);
    }

    for diagnostic in &diagnostics {
        tracing::warn!("{diagnostic}");
    }

    let geometry = ring_geometry(&rings, config.pixels.cell_size);
    BoardLayout {
        traversal: options.traversal,
        rings,
        geometry,
        diagnostics,
    }
}

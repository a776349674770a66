use metropoly_core::Lane;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell address on a ring's square grid; `(0, 0)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: u32,
    pub col: u32,
}

impl GridPos {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Facing of a tile so that it reads from the board interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

impl From<Rotation> for u16 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(format!("rotation must be a multiple of 90 below 360, got {other}")),
        }
    }
}

/// Order in which a ring's perimeter is walked when names are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traversal {
    /// Bottom-left corner, clockwise. Used by the nested-table board.
    #[default]
    Table,
    /// Top-left corner, clockwise. Used by the SVG canvas board.
    Pixel,
}

/// One board position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileCell {
    pub image_path: String,
    pub rotation: Rotation,
    /// `None` for a placeholder cell.
    pub name: Option<String>,
    pub lane: Lane,
    pub is_corner: bool,
    pub grid: GridPos,
}

impl TileCell {
    pub fn is_placeholder(&self) -> bool {
        self.name.is_none()
    }
}

/// One lane's square ring; `cells` follows `traversal` order and has `4 * side - 4` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingLayout {
    pub lane: Lane,
    pub side: u32,
    pub traversal: Traversal,
    pub cells: Vec<TileCell>,
}

impl RingLayout {
    pub fn perimeter(&self) -> u32 {
        crate::ring::perimeter(self.side)
    }

    pub fn cell_at(&self, pos: GridPos) -> Option<&TileCell> {
        self.cells.iter().find(|c| c.grid == pos)
    }

    pub fn filled(&self) -> impl Iterator<Item = &TileCell> {
        self.cells.iter().filter(|c| !c.is_placeholder())
    }

    pub fn corners(&self) -> impl Iterator<Item = &TileCell> {
        self.cells.iter().filter(|c| c.is_corner)
    }
}

/// Where a ring sits on the SVG canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingGeometry {
    pub lane: Lane,
    pub cell_size: f64,
    /// Distance from the canvas origin to the ring's top-left corner, in this ring's cells.
    pub offset_cells: f64,
    /// Edge length of the ring in pixels.
    pub extent: f64,
}

impl RingGeometry {
    pub fn origin(&self) -> f64 {
        self.offset_cells * self.cell_size
    }

    pub fn center(&self) -> f64 {
        self.origin() + self.extent / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiagnosticKind {
    UnknownProperty,
    LaneMismatch { declared: Lane },
    PositionMismatch { declared: u32, listed: usize },
    MissingTileImage { file: String },
    RingOmitted { side: u32 },
}

/// A non-fatal data problem found while laying out the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub lane: Lane,
    pub name: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnknownProperty => write!(
                f,
                "property '{}' listed in the {} lane was not found in the property data",
                self.name, self.lane
            ),
            DiagnosticKind::LaneMismatch { declared } => write!(
                f,
                "property '{}' has lane '{}' but is listed in the {} lane",
                self.name, declared, self.lane
            ),
            DiagnosticKind::PositionMismatch { declared, listed } => write!(
                f,
                "property '{}' has position {} but appears at index {} in the {} lane",
                self.name, declared, listed, self.lane
            ),
            DiagnosticKind::MissingTileImage { file } => write!(
                f,
                "tile file '{}' not found for property '{}', using the null tile",
                file, self.name
            ),
            DiagnosticKind::RingOmitted { side } => write!(
                f,
                "{} ring of side {} is too small to draw and was omitted",
                self.lane, side
            ),
        }
    }
}

/// The three rings of a board, outer to inner, plus what went wrong building them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub traversal: Traversal,
    /// Rings too small to draw are absent; a missing ring also drops every ring inside it.
    pub rings: Vec<RingLayout>,
    pub geometry: Vec<RingGeometry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BoardLayout {
    pub fn ring(&self, lane: Lane) -> Option<&RingLayout> {
        self.rings.iter().find(|r| r.lane == lane)
    }

    pub fn geometry(&self, lane: Lane) -> Option<&RingGeometry> {
        self.geometry.iter().find(|g| g.lane == lane)
    }

    /// Edge length of the square canvas the board occupies.
    pub fn canvas_size(&self) -> f64 {
        self.geometry.first().map_or(0.0, |g| g.extent)
    }
}

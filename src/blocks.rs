//! Block model: the fixed set of block kinds and the positioned, resizable
//! block instances placed on the page.

use crate::grid::PageGrid;
use crate::options::{BlockOption, OptionSet, OptionValue, USE_GLOBAL};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for blocks on the page.
pub type BlockId = Uuid;

/// The fixed set of block kinds available in the library.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// A text header rendered in a decorative font.
    Text,
    /// Horizontal ruled lines for handwriting.
    Ruled,
    /// A square line grid.
    Grid,
    /// A dot lattice.
    Dots,
    /// Checkbox rows with writing lines.
    Checklist,
}

/// All block kinds, in library display order.
pub const BLOCK_KINDS: [BlockKind; 5] = [
    BlockKind::Text,
    BlockKind::Ruled,
    BlockKind::Grid,
    BlockKind::Dots,
    BlockKind::Checklist,
];

impl BlockKind {
    /// Label shown on the library button and panel titles.
    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Text => "Text",
            BlockKind::Ruled => "Ruled lines",
            BlockKind::Grid => "Grid",
            BlockKind::Dots => "Dot grid",
            BlockKind::Checklist => "Checklist",
        }
    }

    /// Default size of a freshly placed block, in grid cells.
    fn default_size_cells(&self) -> (f32, f32) {
        match self {
            BlockKind::Text => (16.0, 4.0),
            BlockKind::Ruled => (16.0, 12.0),
            BlockKind::Grid => (12.0, 12.0),
            BlockKind::Dots => (12.0, 12.0),
            BlockKind::Checklist => (12.0, 10.0),
        }
    }

    /// Builds this kind's default option set.
    ///
    /// Every kind declares the `use_global` flag and the shared border
    /// options; the rest is kind-specific. Declaration order is the order
    /// the options form shows.
    pub fn default_options(&self) -> OptionSet {
        let mut opts = OptionSet::new();
        opts.declare(
            USE_GLOBAL,
            BlockOption::new("Use global values", OptionValue::Flag(true), false),
        );
        opts.declare(
            "border_width",
            BlockOption::new("Border width", OptionValue::Number(2.0), true),
        );
        opts.declare(
            "border_radius",
            BlockOption::new("Border radius", OptionValue::Number(12.0), true),
        );
        match self {
            BlockKind::Text => {
                opts.declare(
                    "font_size",
                    BlockOption::new("Font size", OptionValue::Number(32.0), true),
                );
                opts.declare(
                    "title",
                    BlockOption::new("Title", OptionValue::Text("Title".into()), false),
                );
                opts.declare(
                    "font",
                    BlockOption::new("Font", OptionValue::Text(String::new()), false),
                );
            }
            BlockKind::Ruled => {
                opts.declare(
                    "line_spacing",
                    BlockOption::new("Line spacing", OptionValue::Number(56.0), true),
                );
            }
            BlockKind::Grid => {
                opts.declare(
                    "grid_spacing",
                    BlockOption::new("Grid spacing", OptionValue::Number(39.0), false),
                );
            }
            BlockKind::Dots => {
                opts.declare(
                    "dot_spacing",
                    BlockOption::new("Dot spacing", OptionValue::Number(39.0), false),
                );
                opts.declare(
                    "dot_radius",
                    BlockOption::new("Dot radius", OptionValue::Number(3.0), false),
                );
            }
            BlockKind::Checklist => {
                opts.declare(
                    "line_spacing",
                    BlockOption::new("Line spacing", OptionValue::Number(56.0), true),
                );
                opts.declare(
                    "box_size",
                    BlockOption::new("Box size", OptionValue::Number(28.0), false),
                );
            }
        }
        opts
    }
}

/// A positioned, resizable visual element on the page.
///
/// Position and size are in canvas units, snapped to the page grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    /// Unique generated identifier.
    pub id: BlockId,
    /// Which library kind this block is.
    pub kind: BlockKind,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// This block's option set.
    pub options: OptionSet,
}

impl Block {
    /// Creates a block of `kind` with a fresh id, the kind's default option
    /// set, and a default position/size snapped to `grid`.
    pub fn new(kind: BlockKind, grid: &PageGrid) -> Self {
        let (cells_w, cells_h) = kind.default_size_cells();
        let x = grid.snap(grid.restriction.x + grid.cell);
        let y = grid.snap(grid.restriction.y + grid.cell);
        let width = grid.snap(cells_w * grid.cell);
        let height = grid.snap(cells_h * grid.cell);
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width,
            height,
            options: kind.default_options(),
        }
    }
}

//! Shared application-wide constants.
//! Centralizes page geometry and interaction values used across UI and export.

// Page geometry
/// Intrinsic page width in canvas units (reMarkable panel width).
pub const PAGE_WIDTH: f32 = 1404.0;
/// Intrinsic page height in canvas units (reMarkable panel height).
pub const PAGE_HEIGHT: f32 = 1872.0;

// Grid
/// Number of grid columns the page width is divided into.
pub const GRID_COLUMNS: u32 = 36;
/// Minimum block width/height, expressed in grid cells.
pub const MIN_BLOCK_CELLS: f32 = 3.0;

// Canvas interactions
/// Distance from a block edge (in screen pixels) that grabs a resize handle.
pub const RESIZE_MARGIN: f32 = 7.0;
/// Maximum pointer travel (in screen pixels) for a press/release to count as a tap.
pub const TAP_THRESHOLD: f32 = 6.0;

// File defaults
/// Default file name offered when saving the template document.
pub const DEFAULT_TEMPLATE_JSON: &str = "note-template.json";
/// Default file name offered when exporting the rendered page.
pub const DEFAULT_TEMPLATE_PNG: &str = "note-template.png";
/// Directory scanned for gallery templates (`gallery/<name>/<name>.json`).
pub const GALLERY_DIR: &str = "gallery";
/// Directory scanned for decorative fonts at startup.
pub const FONTS_DIR: &str = "fonts";

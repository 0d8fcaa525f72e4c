//! # Template Tool
//!
//! A visual editor for composing printable note-page templates for e-ink
//! tablets. Blocks from a library (text headers, ruled lines, grids, dot
//! lattices, checklists) are placed on a fixed-size page, dragged and
//! resized on a snapped grid, and configured through per-block and shared
//! global options.
//!
//! ## Features
//! - Interactive block placement, selection, dragging, and resizing
//! - Grid snapping with a placement restriction rectangle
//! - Per-block options with opt-in inheritance from a global option set
//! - JSON save/load of the full editor state
//! - PNG export of the rendered page
//! - A gallery of ready-made templates

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod blocks;
mod constants;
mod grid;
mod options;
mod template;
mod ui;

// Re-export the public data model
pub use blocks::*;
pub use grid::*;
pub use options::*;
pub use template::*;
use ui::TemplateApp;

/// Runs the template editor with default settings.
///
/// Builds the async runtime the file dialogs and font loading run on, then
/// starts the egui event loop.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     template_tool::run_app()
/// }
/// ```
pub fn run_app() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Template Tool",
        options,
        Box::new(|cc| {
            let mut app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| TemplateApp::from_json(&json).ok())
                .unwrap_or_default();
            app.begin_font_load();
            Ok(Box::new(app))
        }),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_default() {
        let template = Template::default();
        assert!(template.blocks.is_empty());
        assert!(template.global_options.is_empty());
        assert_eq!(template.grid, PageGrid::default());
    }

    #[test]
    fn test_block_creation() {
        let grid = PageGrid::default();
        let block = Block::new(BlockKind::Text, &grid);
        assert_eq!(block.kind, BlockKind::Text);
        assert!(block.options.contains(USE_GLOBAL));
    }
}

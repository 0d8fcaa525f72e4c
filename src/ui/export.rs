//! Export: render the current page to SVG and rasterize it to PNG.
//!
//! The SVG builder mirrors the canvas drawing block-for-block, but works in
//! intrinsic page coordinates so the export is independent of window size.
//! Editor helper layers (grid/guide lines) are not exported.

use super::state::{FileOperationResult, TemplateApp};
use crate::blocks::{Block, BlockKind};
use crate::constants;
use std::fmt::Write as _;
use std::sync::Arc;

impl TemplateApp {
    /// Builds the page SVG. Returns `(svg, width, height)`.
    ///
    /// Pure with respect to the document: the same state always produces
    /// the same string.
    pub fn build_page_svg(&self) -> (String, u32, u32) {
        let width = constants::PAGE_WIDTH as u32;
        let height = constants::PAGE_HEIGHT as u32;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = width,
            h = height
        );
        let _ = writeln!(
            out,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" />",
            width, height
        );

        for block in self.template.blocks.values() {
            write_block_svg(&mut out, block, self.template.grid.cell);
        }

        let _ = writeln!(out, "</svg>");
        (out, width, height)
    }

    /// Rasterizes the page and saves it through a PNG save dialog.
    ///
    /// The raster runs synchronously (the page is a fixed, modest size);
    /// only the dialog and disk write happen on the runtime.
    pub fn export_png(&self, ctx: &eframe::egui::Context) {
        let (svg, width, height) = self.build_page_svg();

        let mut opt = usvg::Options::default();
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        for font in &self.fonts.fonts {
            db.load_font_data(font.data.clone());
        }
        opt.fontdb = Arc::new(db);

        let tree = match usvg::Tree::from_data(svg.as_bytes(), &opt) {
            Ok(tree) => tree,
            Err(err) => {
                log::error!("failed to parse export SVG: {err}");
                return;
            }
        };

        let mut pixmap = match tiny_skia::Pixmap::new(width, height) {
            Some(pixmap) => pixmap,
            None => {
                log::error!("failed to allocate {width}x{height} export pixmap");
                return;
            }
        };
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        let sender = self.file.sender.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("PNG", &["png"])
                .set_file_name(constants::DEFAULT_TEMPLATE_PNG)
                .save_file()
                .await
            {
                let path = handle.path().display().to_string();
                let result = match pixmap.save_png(handle.path()) {
                    Ok(()) => FileOperationResult::ExportCompleted(path),
                    Err(err) => {
                        FileOperationResult::Failed(format!("failed to save PNG: {err}"))
                    }
                };
                let _ = sender.send(result);
            }
            ctx.request_repaint();
        });
    }
}

/// Appends one block's SVG subtree, drawn from its current option values
/// and geometry in page coordinates.
fn write_block_svg(out: &mut String, block: &Block, cell: f32) {
    let _ = writeln!(out, "<g>");

    let border_width = block.options.number("border_width").unwrap_or(2.0);
    let border_radius = block.options.number("border_radius").unwrap_or(0.0);
    if border_width > 0.0 {
        let _ = writeln!(
            out,
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"{:.1}\" ry=\"{:.1}\" fill=\"none\" stroke=\"#1e1e1e\" stroke-width=\"{:.1}\" />",
            block.x, block.y, block.width, block.height, border_radius, border_radius, border_width
        );
    }

    match block.kind {
        BlockKind::Text => write_text_svg(out, block, cell),
        BlockKind::Ruled => write_ruled_svg(out, block, cell),
        BlockKind::Grid => write_grid_svg(out, block),
        BlockKind::Dots => write_dots_svg(out, block),
        BlockKind::Checklist => write_checklist_svg(out, block, cell),
    }

    let _ = writeln!(out, "</g>");
}

fn write_text_svg(out: &mut String, block: &Block, cell: f32) {
    let title = block.options.text("title").unwrap_or_default();
    if title.is_empty() {
        return;
    }
    let font_size = block.options.number("font_size").unwrap_or(32.0);
    let font = block.options.text("font").unwrap_or_default();
    let family = if font.is_empty() { "sans-serif" } else { font };
    let _ = writeln!(
        out,
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{:.1}\" font-family=\"{}\" fill=\"#1e1e1e\" dominant-baseline=\"central\">{}</text>",
        block.x + cell * 0.5,
        block.y + block.height / 2.0,
        font_size,
        escape_xml(family),
        escape_xml(title)
    );
}

fn write_ruled_svg(out: &mut String, block: &Block, cell: f32) {
    let spacing = block.options.number("line_spacing").unwrap_or(56.0) as f32;
    if spacing <= 0.0 {
        return;
    }
    let pad = cell * 0.25;
    let mut y = block.y + spacing;
    while y < block.y + block.height - pad {
        let _ = writeln!(
            out,
            "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#1e1e1e\" stroke-width=\"1\" />",
            block.x + pad,
            block.x + block.width - pad,
            y = y
        );
        y += spacing;
    }
}

fn write_grid_svg(out: &mut String, block: &Block) {
    let spacing = block.options.number("grid_spacing").unwrap_or(39.0) as f32;
    if spacing <= 0.0 {
        return;
    }
    let mut x = block.x + spacing;
    while x < block.x + block.width {
        let _ = writeln!(
            out,
            "  <line x1=\"{x:.1}\" y1=\"{:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"#1e1e1e\" stroke-width=\"1\" />",
            block.y,
            block.y + block.height,
            x = x
        );
        x += spacing;
    }
    let mut y = block.y + spacing;
    while y < block.y + block.height {
        let _ = writeln!(
            out,
            "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#1e1e1e\" stroke-width=\"1\" />",
            block.x,
            block.x + block.width,
            y = y
        );
        y += spacing;
    }
}

fn write_dots_svg(out: &mut String, block: &Block) {
    let spacing = block.options.number("dot_spacing").unwrap_or(39.0) as f32;
    let radius = block.options.number("dot_radius").unwrap_or(3.0);
    if spacing <= 0.0 {
        return;
    }
    let mut y = block.y + spacing;
    while y < block.y + block.height {
        let mut x = block.x + spacing;
        while x < block.x + block.width {
            let _ = writeln!(
                out,
                "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"#1e1e1e\" />",
                x, y, radius
            );
            x += spacing;
        }
        y += spacing;
    }
}

fn write_checklist_svg(out: &mut String, block: &Block, cell: f32) {
    let spacing = block.options.number("line_spacing").unwrap_or(56.0) as f32;
    let box_size = block.options.number("box_size").unwrap_or(28.0) as f32;
    if spacing <= 0.0 {
        return;
    }
    let pad = cell * 0.25;
    let mut y = block.y + spacing;
    while y < block.y + block.height - pad {
        let _ = writeln!(
            out,
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"2\" fill=\"none\" stroke=\"#1e1e1e\" stroke-width=\"1\" />",
            block.x + pad,
            y - box_size,
            box_size,
            box_size
        );
        let _ = writeln!(
            out,
            "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#1e1e1e\" stroke-width=\"1\" />",
            block.x + pad + box_size + pad,
            block.x + block.width - pad,
            y = y
        );
        y += spacing;
    }
}

fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

//! Page and block drawing.
//!
//! The page is letterboxed into the central panel and painted white
//! regardless of the UI theme: what is drawn is what the PNG export
//! produces. Blocks draw purely from their current option values and
//! geometry, so repainting with unchanged state yields the same output.

use super::state::TemplateApp;
use crate::blocks::{Block, BlockKind};
use crate::constants;
use eframe::egui;
use eframe::epaint::StrokeKind;

/// Ink color used on the page, independent of the UI theme.
const INK: egui::Color32 = egui::Color32::from_gray(30);
/// Faint color for grid helper lines.
const GRID_LINE: egui::Color32 = egui::Color32::from_rgba_premultiplied(120, 120, 120, 60);
/// Selection highlight color.
const SELECTION: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);

impl TemplateApp {
    /// Lays out the page in the available panel space, runs the pointer
    /// state machine, and paints page, helper layers, and blocks.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(available, egui::Sense::click_and_drag());

        // Letterbox the intrinsic page into the panel, preserving aspect.
        let scale = (available.width() / constants::PAGE_WIDTH)
            .min(available.height() / constants::PAGE_HEIGHT)
            .max(1e-6);
        let size = egui::vec2(
            constants::PAGE_WIDTH * scale,
            constants::PAGE_HEIGHT * scale,
        );
        self.canvas.page_rect = egui::Rect::from_center_size(available.center(), size);

        self.handle_canvas_interaction(ui, &response);

        let painter = ui.painter_at(available);
        let page_rect = self.canvas.page_rect;
        painter.rect_filled(page_rect, 0.0, egui::Color32::WHITE);
        painter.rect_stroke(
            page_rect,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::from_gray(90)),
            StrokeKind::Outside,
        );

        if self.canvas.show_grid_lines {
            self.draw_grid_lines(&painter);
        }
        if self.canvas.show_guide_lines {
            self.draw_guide_lines(&painter);
        }

        for (id, block) in &self.template.blocks {
            let selected = self.interaction.selected_block == Some(*id);
            self.draw_block(&painter, block, selected);
        }
    }

    /// Paints the snap grid over the page.
    fn draw_grid_lines(&self, painter: &egui::Painter) {
        let page_rect = self.canvas.page_rect;
        let step = self.template.grid.cell / self.page_ratio();
        let stroke = egui::Stroke::new(1.0, GRID_LINE);

        let mut x = page_rect.left() + step;
        while x < page_rect.right() {
            painter.line_segment(
                [
                    egui::pos2(x, page_rect.top()),
                    egui::pos2(x, page_rect.bottom()),
                ],
                stroke,
            );
            x += step;
        }
        let mut y = page_rect.top() + step;
        while y < page_rect.bottom() {
            painter.line_segment(
                [
                    egui::pos2(page_rect.left(), y),
                    egui::pos2(page_rect.right(), y),
                ],
                stroke,
            );
            y += step;
        }
    }

    /// Paints the placement restriction rect as a dashed guide.
    fn draw_guide_lines(&self, painter: &egui::Painter) {
        let restriction = self.template.grid.restriction;
        let min = self.page_to_screen(egui::pos2(restriction.x, restriction.y));
        let max = self.page_to_screen(egui::pos2(restriction.right(), restriction.bottom()));
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgba_premultiplied(160, 120, 60, 120));
        let corners = [
            min,
            egui::pos2(max.x, min.y),
            max,
            egui::pos2(min.x, max.y),
            min,
        ];
        for pair in corners.windows(2) {
            painter.extend(egui::Shape::dashed_line(pair, stroke, 6.0, 4.0));
        }
    }

    /// Paints one block: rounded border plus kind-specific content.
    fn draw_block(&self, painter: &egui::Painter, block: &Block, selected: bool) {
        let scale = 1.0 / self.page_ratio();
        let rect = self.block_screen_rect(block);

        let border_width = block.options.number("border_width").unwrap_or(2.0) as f32;
        let border_radius = block.options.number("border_radius").unwrap_or(0.0) as f32;
        if border_width > 0.0 {
            painter.rect_stroke(
                rect,
                border_radius * scale,
                egui::Stroke::new(border_width * scale, INK),
                StrokeKind::Inside,
            );
        }

        match block.kind {
            BlockKind::Text => self.draw_text_content(painter, block, rect, scale),
            BlockKind::Ruled => self.draw_ruled_content(painter, block, rect, scale),
            BlockKind::Grid => self.draw_grid_content(painter, block, rect, scale),
            BlockKind::Dots => self.draw_dots_content(painter, block, rect, scale),
            BlockKind::Checklist => self.draw_checklist_content(painter, block, rect, scale),
        }

        if selected {
            painter.rect_stroke(
                rect.expand(2.0),
                border_radius * scale,
                egui::Stroke::new(2.0, SELECTION),
                StrokeKind::Outside,
            );
        }
    }

    /// Resolves a block's `font` option to an installed family, falling back
    /// to the proportional default.
    fn font_family(&self, name: &str) -> egui::FontFamily {
        if !name.is_empty() && self.fonts.fonts.iter().any(|f| f.family == name) {
            egui::FontFamily::Name(name.into())
        } else {
            egui::FontFamily::Proportional
        }
    }

    fn draw_text_content(
        &self,
        painter: &egui::Painter,
        block: &Block,
        rect: egui::Rect,
        scale: f32,
    ) {
        let title = block.options.text("title").unwrap_or_default();
        if title.is_empty() {
            return;
        }
        let font_size = block.options.number("font_size").unwrap_or(32.0) as f32;
        let family = self.font_family(block.options.text("font").unwrap_or_default());
        let pad = self.template.grid.cell * 0.5 * scale;
        painter.text(
            egui::pos2(rect.left() + pad, rect.center().y),
            egui::Align2::LEFT_CENTER,
            title,
            egui::FontId::new(font_size * scale, family),
            INK,
        );
    }

    fn draw_ruled_content(
        &self,
        painter: &egui::Painter,
        block: &Block,
        rect: egui::Rect,
        scale: f32,
    ) {
        let spacing = block.options.number("line_spacing").unwrap_or(56.0) as f32 * scale;
        if spacing <= 0.0 {
            return;
        }
        let pad = self.template.grid.cell * 0.25 * scale;
        let stroke = egui::Stroke::new(1.0 * scale.max(0.5), INK);
        let mut y = rect.top() + spacing;
        while y < rect.bottom() - pad {
            painter.line_segment(
                [
                    egui::pos2(rect.left() + pad, y),
                    egui::pos2(rect.right() - pad, y),
                ],
                stroke,
            );
            y += spacing;
        }
    }

    fn draw_grid_content(
        &self,
        painter: &egui::Painter,
        block: &Block,
        rect: egui::Rect,
        scale: f32,
    ) {
        let spacing = block.options.number("grid_spacing").unwrap_or(39.0) as f32 * scale;
        if spacing <= 0.0 {
            return;
        }
        let stroke = egui::Stroke::new(1.0 * scale.max(0.5), INK);
        let mut x = rect.left() + spacing;
        while x < rect.right() {
            painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
            x += spacing;
        }
        let mut y = rect.top() + spacing;
        while y < rect.bottom() {
            painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
            y += spacing;
        }
    }

    fn draw_dots_content(
        &self,
        painter: &egui::Painter,
        block: &Block,
        rect: egui::Rect,
        scale: f32,
    ) {
        let spacing = block.options.number("dot_spacing").unwrap_or(39.0) as f32 * scale;
        let radius = block.options.number("dot_radius").unwrap_or(3.0) as f32 * scale;
        if spacing <= 0.0 {
            return;
        }
        let mut y = rect.top() + spacing;
        while y < rect.bottom() {
            let mut x = rect.left() + spacing;
            while x < rect.right() {
                painter.circle_filled(egui::pos2(x, y), radius, INK);
                x += spacing;
            }
            y += spacing;
        }
    }

    fn draw_checklist_content(
        &self,
        painter: &egui::Painter,
        block: &Block,
        rect: egui::Rect,
        scale: f32,
    ) {
        let spacing = block.options.number("line_spacing").unwrap_or(56.0) as f32 * scale;
        let box_size = block.options.number("box_size").unwrap_or(28.0) as f32 * scale;
        if spacing <= 0.0 {
            return;
        }
        let pad = self.template.grid.cell * 0.25 * scale;
        let stroke = egui::Stroke::new(1.0 * scale.max(0.5), INK);
        let mut y = rect.top() + spacing;
        while y < rect.bottom() - pad {
            let box_rect = egui::Rect::from_min_size(
                egui::pos2(rect.left() + pad, y - box_size),
                egui::vec2(box_size, box_size),
            );
            painter.rect_stroke(box_rect, 2.0 * scale, stroke, StrokeKind::Inside);
            painter.line_segment(
                [
                    egui::pos2(box_rect.right() + pad, y),
                    egui::pos2(rect.right() - pad, y),
                ],
                stroke,
            );
            y += spacing;
        }
    }
}

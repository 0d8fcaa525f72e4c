//! Canvas interaction: screen↔page coordinate mapping, block hit testing,
//! and the drag/resize/tap pointer state machine.
//!
//! Pointer deltas arrive in screen pixels and are converted to canvas units
//! with the fixed intrinsic/rendered ratio before being accumulated into a
//! block's position or size. Every accumulated value is snapped to the page
//! grid and clamped to its restriction rectangle before it reaches the block.

use super::state::{PointerState, ResizeEdges, TemplateApp};
use crate::blocks::{Block, BlockId};
use crate::constants;
use eframe::egui;

impl TemplateApp {
    /// Canvas units per screen pixel for the current frame's page rect.
    pub fn page_ratio(&self) -> f32 {
        constants::PAGE_WIDTH / self.canvas.page_rect.width().max(1.0)
    }

    /// Converts a screen position to page (canvas-unit) coordinates.
    pub fn screen_to_page(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        let ratio = self.page_ratio();
        let rel = screen_pos - self.canvas.page_rect.min;
        egui::pos2(rel.x * ratio, rel.y * ratio)
    }

    /// Converts a page (canvas-unit) position to screen coordinates.
    pub fn page_to_screen(&self, page_pos: egui::Pos2) -> egui::Pos2 {
        let ratio = self.page_ratio();
        self.canvas.page_rect.min + egui::vec2(page_pos.x / ratio, page_pos.y / ratio)
    }

    /// Screen rectangle a block currently occupies.
    pub fn block_screen_rect(&self, block: &Block) -> egui::Rect {
        egui::Rect::from_min_max(
            self.page_to_screen(egui::pos2(block.x, block.y)),
            self.page_to_screen(egui::pos2(block.x + block.width, block.y + block.height)),
        )
    }

    /// Finds the topmost block at the given page position, if any.
    ///
    /// Blocks draw in map order, so the hit scan runs back to front.
    pub fn find_block_at(&self, page_pos: egui::Pos2) -> Option<BlockId> {
        for (id, block) in self.template.blocks.iter().rev() {
            let rect = egui::Rect::from_min_size(
                egui::pos2(block.x, block.y),
                egui::vec2(block.width, block.height),
            );
            if rect.contains(page_pos) {
                return Some(*id);
            }
        }
        None
    }

    /// Which edges of `block` a press at `screen_pos` grabs, using the
    /// resize margin in screen pixels.
    fn hit_edges(&self, block: &Block, screen_pos: egui::Pos2) -> ResizeEdges {
        let rect = self.block_screen_rect(block);
        let margin = constants::RESIZE_MARGIN;
        if !rect.expand(margin).contains(screen_pos) {
            return ResizeEdges::default();
        }
        ResizeEdges {
            left: (screen_pos.x - rect.left()).abs() <= margin,
            right: (screen_pos.x - rect.right()).abs() <= margin,
            top: (screen_pos.y - rect.top()).abs() <= margin,
            bottom: (screen_pos.y - rect.bottom()).abs() <= margin,
        }
    }

    /// Drives the pointer state machine for one frame.
    ///
    /// Press on a block edge starts a resize, press inside starts a drag;
    /// a press/release without exceeding the tap threshold toggles that
    /// block's exclusive selection (or clears it on empty page).
    pub fn handle_canvas_interaction(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let primary_down = ui.input(|i| i.pointer.primary_down());

        if primary_down {
            let Some(pos) = response.interact_pointer_pos() else {
                return;
            };

            if self.interaction.press_pos.is_none() {
                self.interaction.press_pos = Some(pos);
                self.interaction.press_travel = 0.0;
                self.begin_gesture(pos);
                return;
            }

            let delta = ui.input(|i| i.pointer.delta());
            self.interaction.press_travel += delta.length();
            match self.interaction.pointer {
                PointerState::Dragging { .. } => self.apply_drag(delta),
                PointerState::Resizing { .. } => self.apply_resize(delta),
                PointerState::Idle => {}
            }
        } else if let Some(press) = self.interaction.press_pos.take() {
            if self.interaction.press_travel <= constants::TAP_THRESHOLD {
                self.handle_tap(press);
            }
            self.interaction.pointer = PointerState::Idle;
        }
    }

    /// Starts a drag or resize if the press landed on a block.
    fn begin_gesture(&mut self, screen_pos: egui::Pos2) {
        let page_pos = self.screen_to_page(screen_pos);
        let Some(id) = self.find_block_at(page_pos) else {
            self.interaction.pointer = PointerState::Idle;
            return;
        };
        let Some(block) = self.template.blocks.get(&id) else {
            return;
        };
        let edges = self.hit_edges(block, screen_pos);
        self.interaction.pointer = if edges.any() {
            PointerState::Resizing {
                id,
                edges,
                raw: (block.x, block.y, block.width, block.height),
            }
        } else {
            PointerState::Dragging {
                id,
                raw: (block.x, block.y),
            }
        };
    }

    /// Toggles exclusive selection from a tap at the given screen position.
    fn handle_tap(&mut self, screen_pos: egui::Pos2) {
        let page_pos = self.screen_to_page(screen_pos);
        self.interaction.selected_block = match self.find_block_at(page_pos) {
            Some(id) if self.interaction.selected_block == Some(id) => None,
            Some(id) => Some(id),
            None => None,
        };
    }

    /// Applies a drag movement tick.
    ///
    /// The screen-pixel delta scales by the page ratio into canvas units and
    /// accumulates into the unsnapped origin; the block receives the snapped,
    /// restriction-clamped result.
    pub fn apply_drag(&mut self, screen_delta: egui::Vec2) {
        let ratio = self.page_ratio();
        let grid = self.template.grid;
        if let PointerState::Dragging { id, ref mut raw } = self.interaction.pointer {
            raw.0 += screen_delta.x * ratio;
            raw.1 += screen_delta.y * ratio;
            if let Some(block) = self.template.blocks.get_mut(&id) {
                let (x, y) = grid.clamp_origin(
                    grid.snap(raw.0),
                    grid.snap(raw.1),
                    block.width,
                    block.height,
                );
                block.x = x;
                block.y = y;
            }
        }
    }

    /// Applies a resize movement tick on the grabbed edges.
    ///
    /// The moving edges snap to the grid and are held to the minimum block
    /// size and the restriction rect; non-grabbed edges stay put.
    pub fn apply_resize(&mut self, screen_delta: egui::Vec2) {
        let ratio = self.page_ratio();
        let grid = self.template.grid;
        if let PointerState::Resizing {
            id,
            edges,
            ref mut raw,
        } = self.interaction.pointer
        {
            let dx = screen_delta.x * ratio;
            let dy = screen_delta.y * ratio;
            if edges.left {
                raw.0 += dx;
                raw.2 -= dx;
            }
            if edges.right {
                raw.2 += dx;
            }
            if edges.top {
                raw.1 += dy;
                raw.3 -= dy;
            }
            if edges.bottom {
                raw.3 += dy;
            }

            if let Some(block) = self.template.blocks.get_mut(&id) {
                let min = grid.min_block_size();
                let restriction = grid.restriction;
                let mut left = grid.snap(raw.0);
                let mut top = grid.snap(raw.1);
                let mut right = grid.snap(raw.0 + raw.2);
                let mut bottom = grid.snap(raw.1 + raw.3);
                if edges.left {
                    left = left.max(restriction.x).min(right - min);
                }
                if edges.right {
                    right = right.min(restriction.right()).max(left + min);
                }
                if edges.top {
                    top = top.max(restriction.y).min(bottom - min);
                }
                if edges.bottom {
                    bottom = bottom.min(restriction.bottom()).max(top + min);
                }
                block.x = left;
                block.y = top;
                block.width = right - left;
                block.height = bottom - top;
            }
        }
    }
}

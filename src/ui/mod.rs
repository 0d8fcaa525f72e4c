//! User interface components for the template editor.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main TemplateApp
//! - `canvas` - Coordinate mapping and the drag/resize/tap state machine
//! - `rendering` - Drawing the page, helper layers, and blocks
//! - `options_panel` - The generated options form
//! - `file_ops` - Save/load plumbing over the async runtime
//! - `export` - SVG build and PNG rasterization
//! - `fonts` - Startup font discovery and installation
//! - `gallery` - Built-in and on-disk gallery templates

mod canvas;
mod export;
mod file_ops;
mod fonts;
mod gallery;
mod options_panel;
mod rendering;
mod state;

#[cfg(test)]
mod tests;

pub use state::TemplateApp;

use self::state::PendingFileAction;
use crate::blocks::BLOCK_KINDS;
use eframe::egui;

impl eframe::App for TemplateApp {
    /// Persist UI preferences between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string("app_state", json),
            Err(err) => log::error!("failed to serialize app state: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// Lays out the toolbar, the block library, the options panel, and the
    /// page canvas, and services the font/file channels.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_font_loading(ctx);
        self.handle_pending_operations(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::left("library_panel")
            .resizable(false)
            .default_width(140.0)
            .show(ctx, |ui| {
                self.draw_library(ui);
            });

        egui::SidePanel::right("options_panel")
            .resizable(true)
            .default_width(self.options_panel_width)
            .show(ctx, |ui| {
                self.options_panel_width = ui.available_width().clamp(180.0, 480.0);
                self.draw_options_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        if self.gallery_open {
            self.draw_gallery_modal(ctx);
        }
    }
}

impl TemplateApp {
    /// Draws the fixed toolbar action set.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Export PNG").clicked() {
                self.file.pending = Some(PendingFileAction::ExportPng);
            }
            if ui.button("Load").clicked() {
                self.file.pending = Some(PendingFileAction::Load);
            }
            if ui.button("Save").clicked() {
                self.file.pending = Some(PendingFileAction::Save);
            }

            ui.separator();

            let has_selection = self.interaction.selected_block.is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete Block"))
                .clicked()
            {
                self.delete_selected_block();
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("To Front"))
                .clicked()
            {
                if let Some(id) = self.interaction.selected_block {
                    self.template.bring_to_front(&id);
                }
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("To Back"))
                .clicked()
            {
                if let Some(id) = self.interaction.selected_block {
                    self.template.send_to_back(&id);
                }
            }

            ui.separator();

            if ui.button("Gallery").clicked() {
                self.gallery_open = !self.gallery_open;
            }

            ui.separator();

            ui.checkbox(&mut self.canvas.show_grid_lines, "Grid lines");
            ui.checkbox(&mut self.canvas.show_guide_lines, "Guides");
            ui.checkbox(&mut self.dark_mode, "Dark mode");
        });
    }

    /// Draws the block library. Buttons stay disabled until the font load
    /// has resolved.
    fn draw_library(&mut self, ui: &mut egui::Ui) {
        ui.heading("Library");
        ui.separator();
        if !self.fonts.ready {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading fonts…");
            });
        }
        ui.add_enabled_ui(self.fonts.ready, |ui| {
            for kind in BLOCK_KINDS {
                if ui.button(kind.label()).clicked() {
                    self.template.add_block(kind);
                }
            }
        });
    }

    /// Draws the gallery modal listing built-in and on-disk templates.
    fn draw_gallery_modal(&mut self, ctx: &egui::Context) {
        let mut open = self.gallery_open;
        let mut chosen: Option<String> = None;
        egui::Window::new("Gallery")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Start from a ready-made template:");
                ui.add_space(4.0);
                for name in gallery::gallery_template_names() {
                    if ui.button(&name).clicked() {
                        chosen = Some(name.clone());
                    }
                }
            });
        if let Some(name) = chosen {
            self.file.pending = Some(PendingFileAction::LoadGallery(name));
            open = false;
        }
        self.gallery_open = open;
    }

    /// Removes the selected block and clears the selection.
    pub fn delete_selected_block(&mut self) {
        if let Some(id) = self.interaction.selected_block.take() {
            self.template.remove_block(&id);
        }
    }
}

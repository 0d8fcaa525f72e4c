//! The options form: one control per option, generated from the selected
//! block's option set, or from the global set when nothing is selected.

use super::state::TemplateApp;
use crate::options::{OptionValue, USE_GLOBAL};
use eframe::egui;

impl TemplateApp {
    /// Draws the options panel for the current selection scope.
    pub fn draw_options_panel(&mut self, ui: &mut egui::Ui) {
        // A selection may reference a block deleted or replaced by a load.
        if let Some(id) = self.interaction.selected_block {
            if !self.template.blocks.contains_key(&id) {
                self.interaction.selected_block = None;
            }
        }

        if self.template.blocks.is_empty() {
            ui.heading("Options");
            ui.separator();
            ui.label("No blocks on the page yet. Pick one from the library.");
            return;
        }

        match self.interaction.selected_block {
            Some(id) => {
                ui.heading("Block Options");
                ui.separator();
                self.draw_block_options(ui, id);
            }
            None => {
                ui.heading("Global Options");
                ui.separator();
                self.draw_global_options(ui);
            }
        }
    }

    /// Form for one block's option set. Edits land on that block only,
    /// except the `use_global` opt-in, which re-inherits the global values.
    fn draw_block_options(&mut self, ui: &mut egui::Ui, id: crate::blocks::BlockId) {
        let mut opted_in = false;
        if let Some(block) = self.template.blocks.get_mut(&id) {
            ui.label(block.kind.label());
            ui.add_space(4.0);
            egui::Grid::new("block_options")
                .num_columns(2)
                .show(ui, |ui| {
                    for (name, opt) in block.options.iter_mut() {
                        ui.label(&opt.label);
                        let changed = edit_value(ui, name, &mut opt.value);
                        if changed && name.as_str() == USE_GLOBAL {
                            opted_in = opt.value.as_flag().unwrap_or(false);
                        }
                        ui.end_row();
                    }
                });
        }

        if opted_in {
            let globals = self.template.global_options.clone();
            if let Some(block) = self.template.blocks.get_mut(&id) {
                block.options.inherit(&globals);
            }
        }
    }

    /// Form for the global option set. Edits propagate to every block that
    /// currently inherits the touched option.
    fn draw_global_options(&mut self, ui: &mut egui::Ui) {
        let mut edits: Vec<(String, OptionValue)> = Vec::new();
        let snapshot = self.template.global_options.clone();
        egui::Grid::new("global_options")
            .num_columns(2)
            .show(ui, |ui| {
                for (name, opt) in snapshot.iter() {
                    let mut value = opt.value.clone();
                    ui.label(&opt.label);
                    if edit_value(ui, name, &mut value) {
                        edits.push((name.clone(), value));
                    }
                    ui.end_row();
                }
            });
        for (name, value) in edits {
            self.template.set_global_option(&name, value);
        }
    }
}

/// One form control, typed by the value's declared kind. Returns whether
/// the user changed the value this frame.
fn edit_value(ui: &mut egui::Ui, name: &str, value: &mut OptionValue) -> bool {
    match value {
        OptionValue::Number(n) => ui
            .add(egui::DragValue::new(n).speed(1.0))
            .changed(),
        OptionValue::Flag(b) => ui.checkbox(b, "").changed(),
        OptionValue::Text(s) => ui
            .add(egui::TextEdit::singleline(s).id_salt(name))
            .changed(),
    }
}

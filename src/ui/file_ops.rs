//! File operations: saving and loading template documents.
//!
//! Dialogs run on the async runtime; results come back to the UI thread
//! over the file channel and are applied at the start of the next frame.
//! Every load source (file picker, gallery) funnels through the same
//! validation in [`Template::from_json`].

use super::gallery;
use super::state::{FileOperationResult, PendingFileAction, TemplateApp};
use crate::constants;
use crate::template::Template;
use eframe::egui;

impl TemplateApp {
    /// Processes completed file operations and launches pending ones.
    pub fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.file.receiver.try_recv() {
            match result {
                FileOperationResult::SaveCompleted(path) => {
                    log::info!("template saved to {path}");
                }
                FileOperationResult::ExportCompleted(path) => {
                    log::info!("page exported to {path}");
                }
                FileOperationResult::LoadCompleted(source, content) => {
                    match Template::from_json(&content) {
                        Ok(template) => {
                            self.apply_loaded_template(template);
                            log::info!("template loaded from {source}");
                        }
                        Err(err) => {
                            // Reject without touching the live document.
                            log::error!("could not load template from {source}: {err}");
                        }
                    }
                }
                FileOperationResult::Failed(message) => {
                    log::error!("file operation failed: {message}");
                }
            }
        }

        let Some(action) = self.file.pending.take() else {
            return;
        };
        match action {
            PendingFileAction::Save => self.start_save(ctx),
            PendingFileAction::Load => self.start_load(ctx),
            PendingFileAction::LoadGallery(name) => self.start_gallery_load(ctx, name),
            PendingFileAction::ExportPng => self.export_png(ctx),
        }
    }

    fn start_save(&self, ctx: &egui::Context) {
        let json = match self.template.to_json() {
            Ok(json) => json,
            Err(err) => {
                log::error!("failed to serialize template: {err}");
                return;
            }
        };
        let sender = self.file.sender.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name(constants::DEFAULT_TEMPLATE_JSON)
                .save_file()
                .await
            {
                let path = handle.path().display().to_string();
                let result = match std::fs::write(handle.path(), json) {
                    Ok(()) => FileOperationResult::SaveCompleted(path),
                    Err(err) => {
                        FileOperationResult::Failed(format!("failed to write {path}: {err}"))
                    }
                };
                let _ = sender.send(result);
            }
            ctx.request_repaint();
        });
    }

    fn start_load(&self, ctx: &egui::Context) {
        let sender = self.file.sender.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file()
                .await
            {
                let path = handle.path().display().to_string();
                let result = match std::fs::read_to_string(handle.path()) {
                    Ok(content) => FileOperationResult::LoadCompleted(path, content),
                    Err(err) => {
                        FileOperationResult::Failed(format!("failed to read {path}: {err}"))
                    }
                };
                let _ = sender.send(result);
            }
            ctx.request_repaint();
        });
    }

    fn start_gallery_load(&self, ctx: &egui::Context, name: String) {
        let sender = self.file.sender.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let result = match gallery::load_gallery_template(&name) {
                Ok(content) => FileOperationResult::LoadCompleted(format!("gallery/{name}"), content),
                Err(err) => FileOperationResult::Failed(err),
            };
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }
}

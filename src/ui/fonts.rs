//! Decorative font loading.
//!
//! Fonts are discovered once at startup by a task on the runtime; its
//! single completion message installs them into the egui context and
//! enables the block library. There is no polling: the channel message is
//! the readiness signal.

use super::state::{FontLoadResult, LoadedFont, TemplateApp};
use crate::constants;
use eframe::egui;
use std::path::Path;
use std::sync::Arc;

impl TemplateApp {
    /// Kicks off the one-shot font discovery task. Idempotent.
    pub fn begin_font_load(&mut self) {
        if self.fonts.started {
            return;
        }
        self.fonts.started = true;
        let sender = self.fonts.sender.clone();
        tokio::spawn(async move {
            let fonts = discover_fonts(Path::new(constants::FONTS_DIR));
            let _ = sender.send(FontLoadResult::Loaded(fonts));
        });
    }

    /// Applies the font load result once it arrives: registers every family
    /// with egui and flips the readiness flag that gates the library.
    pub fn handle_font_loading(&mut self, ctx: &egui::Context) {
        if self.fonts.ready {
            return;
        }
        while let Ok(FontLoadResult::Loaded(fonts)) = self.fonts.receiver.try_recv() {
            if !fonts.is_empty() {
                let mut definitions = egui::FontDefinitions::default();
                for font in &fonts {
                    definitions.font_data.insert(
                        font.family.clone(),
                        Arc::new(egui::FontData::from_owned(font.data.clone())),
                    );
                    definitions
                        .families
                        .insert(
                            egui::FontFamily::Name(font.family.clone().into()),
                            vec![font.family.clone()],
                        );
                }
                ctx.set_fonts(definitions);
            }
            log::info!("font load resolved with {} decorative font(s)", fonts.len());
            self.fonts.fonts = fonts;
            self.fonts.ready = true;
        }
    }
}

/// Reads every `.ttf`/`.otf` in `dir`, registering each under its file stem.
/// A missing directory resolves to an empty set, which still unlocks the
/// library: the built-in fonts cover the fallback.
fn discover_fonts(dir: &Path) -> Vec<LoadedFont> {
    let mut fonts = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return fonts;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
            .unwrap_or(false);
        if !is_font {
            continue;
        }
        let Some(family) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        match std::fs::read(&path) {
            Ok(data) => fonts.push(LoadedFont {
                family: family.to_string(),
                data,
            }),
            Err(err) => log::warn!("skipping font {}: {err}", path.display()),
        }
    }
    fonts.sort_by(|a, b| a.family.cmp(&b.family));
    fonts
}

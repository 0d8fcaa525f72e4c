//! Application state management structures.
//!
//! This module contains the state structures tracking the editor session:
//! the template document, canvas display state, pointer interaction state,
//! file operations, and font loading.

use crate::blocks::BlockId;
use crate::template::Template;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Which edges of a block a resize gesture grabbed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeEdges {
    /// Left edge grabbed.
    pub left: bool,
    /// Right edge grabbed.
    pub right: bool,
    /// Top edge grabbed.
    pub top: bool,
    /// Bottom edge grabbed.
    pub bottom: bool,
}

impl ResizeEdges {
    /// Whether any edge is grabbed.
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// The pointer interaction state machine for the page canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A block is being dragged. `raw` holds the unsnapped origin the
    /// screen deltas accumulate into; the block itself only ever holds the
    /// snapped, clamped result.
    Dragging {
        /// Block under the pointer.
        id: BlockId,
        /// Accumulated unsnapped origin in canvas units.
        raw: (f32, f32),
    },
    /// A block is being resized from the grabbed edges.
    Resizing {
        /// Block under the pointer.
        id: BlockId,
        /// Which edges move with the pointer.
        edges: ResizeEdges,
        /// Accumulated unsnapped rect (x, y, width, height) in canvas units.
        raw: (f32, f32, f32, f32),
    },
}

fn default_page_rect() -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1.0, 1.0))
}

/// Canvas display state: where the page landed on screen this frame and
/// which helper layers are visible.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Screen rectangle the page was letterboxed into this frame.
    #[serde(skip, default = "default_page_rect")]
    pub page_rect: egui::Rect,
    /// Whether grid lines are drawn over the page.
    pub show_grid_lines: bool,
    /// Whether the placement restriction guide is drawn.
    pub show_guide_lines: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            page_rect: default_page_rect(),
            show_grid_lines: true,
            show_guide_lines: true,
        }
    }
}

/// User interaction state: selection and the active pointer gesture.
#[derive(Default)]
pub struct InteractionState {
    /// Currently selected block, if any. Drives the options panel scope.
    pub selected_block: Option<BlockId>,
    /// Active pointer gesture.
    pub pointer: PointerState,
    /// Screen position of the initial press, for tap detection.
    pub press_pos: Option<egui::Pos2>,
    /// Total pointer travel since the press, in screen pixels.
    pub press_travel: f32,
}

/// Messages sent from async file operations back to the main thread.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Save completed successfully at the given path.
    SaveCompleted(String),
    /// A document was loaded: source label and raw JSON content.
    LoadCompleted(String, String),
    /// PNG export completed successfully at the given path.
    ExportCompleted(String),
    /// Operation failed with an error message.
    Failed(String),
}

/// A file action requested by the toolbar, picked up on the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingFileAction {
    /// Show a save dialog and write the document.
    Save,
    /// Show an open dialog and read a document.
    Load,
    /// Load the named gallery template.
    LoadGallery(String),
    /// Export the page as PNG.
    ExportPng,
}

/// File operation state: the pending action and the result channel.
pub struct FileState {
    /// Action requested by the UI, processed once per frame.
    pub pending: Option<PendingFileAction>,
    /// Sender handed to spawned tasks.
    pub sender: Sender<FileOperationResult>,
    /// Receiver drained on the main thread.
    pub receiver: Receiver<FileOperationResult>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            pending: None,
            sender,
            receiver,
        }
    }
}

/// A loaded decorative font: family name and raw bytes.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// Family name the font is registered under.
    pub family: String,
    /// Raw font file bytes.
    pub data: Vec<u8>,
}

/// The single message resolving the font load.
#[derive(Debug)]
pub enum FontLoadResult {
    /// All discovered fonts, possibly empty.
    Loaded(Vec<LoadedFont>),
}

/// Font loading state.
///
/// The block library stays disabled until `ready` flips, which happens on
/// exactly one message: the single resolution point of the startup load.
pub struct FontState {
    /// Whether the load resolved and the library is enabled.
    pub ready: bool,
    /// Fonts installed in the UI and available to the exporter.
    pub fonts: Vec<LoadedFont>,
    /// Sender handed to the loader task.
    pub sender: Sender<FontLoadResult>,
    /// Receiver polled on the main thread.
    pub receiver: Receiver<FontLoadResult>,
    /// Whether the loader task was started.
    pub started: bool,
}

impl Default for FontState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            ready: false,
            fonts: Vec::new(),
            sender,
            receiver,
            started: false,
        }
    }
}

/// The main application: the template document plus all UI session state.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateApp {
    /// The document being edited.
    #[serde(skip)]
    pub template: Template,
    /// Canvas display state.
    pub canvas: CanvasState,
    /// Pointer interaction state.
    #[serde(skip)]
    pub interaction: InteractionState,
    /// File operation state.
    #[serde(skip)]
    pub file: FileState,
    /// Font loading state.
    #[serde(skip)]
    pub fonts: FontState,
    /// Whether the gallery modal is open.
    #[serde(skip)]
    pub gallery_open: bool,
    /// Whether dark mode visuals are enabled.
    pub dark_mode: bool,
    /// Remembered width of the options panel across sessions.
    pub options_panel_width: f32,
}

impl Default for TemplateApp {
    fn default() -> Self {
        Self {
            template: Template::new(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            file: FileState::default(),
            fonts: FontState::default(),
            gallery_open: false,
            dark_mode: true,
            options_panel_width: 280.0,
        }
    }
}

impl TemplateApp {
    /// Serializes the persistable UI preferences to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restores UI preferences from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replaces the live document with a freshly loaded one.
    ///
    /// Blocks, grid, and global options swap together; selection and any
    /// in-flight gesture are cleared so nothing references a stale id.
    pub fn apply_loaded_template(&mut self, template: Template) {
        self.template = template;
        self.template.refresh_global_options();
        self.interaction.selected_block = None;
        self.interaction.pointer = PointerState::Idle;
    }
}

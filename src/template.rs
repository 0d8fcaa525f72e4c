//! The template document: the page grid, the block map, and the global
//! option set, plus JSON (de)serialization of the whole editor state.
//!
//! The block map is insertion-ordered; map order is z-order (the last entry
//! draws on top).

use crate::blocks::{Block, BlockId, BlockKind};
use crate::grid::PageGrid;
use crate::options::{OptionSet, OptionValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the template load path.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The document is missing one of the required top-level keys.
    #[error("template document is missing the `{0}` key")]
    MissingKey(&'static str),
    /// The document is not valid JSON or does not match the schema.
    #[error("failed to parse template document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level keys every persisted document must carry.
const REQUIRED_KEYS: [&str; 3] = ["grid", "blocks", "globalOptions"];

/// The full editor document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    /// Snap geometry the blocks are laid out on.
    pub grid: PageGrid,
    /// All blocks, keyed by id. Map order is z-order, last on top.
    pub blocks: IndexMap<BlockId, Block>,
    /// The shared global option values.
    #[serde(rename = "globalOptions")]
    pub global_options: OptionSet,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            grid: PageGrid::default(),
            blocks: IndexMap::new(),
            global_options: OptionSet::new(),
        }
    }
}

impl Template {
    /// Creates an empty template on the default page grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the document as pretty JSON. A structural snapshot: what
    /// is in memory is what lands on disk.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a persisted document.
    ///
    /// Validates that the three required top-level keys are present before
    /// attempting deserialization, so a wrong file is rejected with a
    /// pointed diagnostic instead of a schema error. Callers keep their
    /// current state on any `Err`.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let doc: serde_json::Value = serde_json::from_str(json)?;
        for key in REQUIRED_KEYS {
            if doc.get(key).is_none() {
                return Err(TemplateError::MissingKey(key));
            }
        }
        Ok(serde_json::from_value(doc)?)
    }

    /// Places a new block of `kind`, inheriting current global values when
    /// its defaults opt in, and refreshes the global set.
    ///
    /// Returns the new block's id. The block is appended, so it draws on top.
    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        let mut block = Block::new(kind, &self.grid);
        block.options.inherit(&self.global_options);
        let id = block.id;
        self.blocks.insert(id, block);
        self.refresh_global_options();
        id
    }

    /// Removes a block and sweeps global options no block declares anymore.
    ///
    /// Returns `true` if the block existed.
    pub fn remove_block(&mut self, id: &BlockId) -> bool {
        let removed = self.blocks.shift_remove(id).is_some();
        if removed {
            self.refresh_global_options();
        }
        removed
    }

    /// Reconciles the global option set with the blocks on the page: adds
    /// global-flagged options newly declared by any block, then deletes
    /// orphans no block declares. Both passes run in map order.
    pub fn refresh_global_options(&mut self) {
        for block in self.blocks.values() {
            self.global_options.add_global(&block.options);
        }

        let orphaned: Vec<String> = self
            .global_options
            .names()
            .filter(|name| {
                !self
                    .blocks
                    .values()
                    .any(|block| block.options.contains(name.as_str()))
            })
            .cloned()
            .collect();
        self.global_options.delete(orphaned);
    }

    /// Sets a global option's value and propagates it to every block that
    /// currently inherits it.
    ///
    /// Returns the ids of the blocks whose value changed, in z-order.
    pub fn set_global_option(&mut self, name: &str, value: OptionValue) -> Vec<BlockId> {
        if !self.global_options.set(name, value.clone()) {
            return Vec::new();
        }
        let mut affected = Vec::new();
        for (id, block) in self.blocks.iter_mut() {
            if block.options.set_global(name, &value) {
                affected.push(*id);
            }
        }
        affected
    }

    /// Moves a block to the end of the map so it draws above everything.
    pub fn bring_to_front(&mut self, id: &BlockId) {
        if let Some(index) = self.blocks.get_index_of(id) {
            self.blocks.move_index(index, self.blocks.len() - 1);
        }
    }

    /// Moves a block to the start of the map so it draws below everything.
    pub fn send_to_back(&mut self, id: &BlockId) {
        if let Some(index) = self.blocks.get_index_of(id) {
            self.blocks.move_index(index, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::USE_GLOBAL;

    #[test]
    fn roundtrip_preserves_blocks_grid_and_globals() {
        let mut template = Template::new();
        let text_id = template.add_block(BlockKind::Text);
        let ruled_id = template.add_block(BlockKind::Ruled);

        // Nudge state away from defaults so the roundtrip is meaningful.
        if let Some(block) = template.blocks.get_mut(&text_id) {
            block.x = 78.0;
            block.y = 117.0;
            block.width = 390.0;
            block
                .options
                .set("title", OptionValue::Text("Agenda".into()));
        }
        template.set_global_option("border_width", OptionValue::Number(4.0));

        let json = template.to_json().expect("serialize");
        let restored = Template::from_json(&json).expect("deserialize");

        assert_eq!(restored.blocks.len(), template.blocks.len());
        assert_eq!(restored.grid, template.grid);
        assert_eq!(restored.global_options, template.global_options);

        let restored_text = &restored.blocks[&text_id];
        assert_eq!(restored_text.kind, BlockKind::Text);
        assert_eq!((restored_text.x, restored_text.y), (78.0, 117.0));
        assert_eq!(restored_text.width, 390.0);
        assert_eq!(restored_text.options.text("title"), Some("Agenda"));
        assert_eq!(restored.blocks[&ruled_id].kind, BlockKind::Ruled);

        // Z-order (map order) survives the roundtrip.
        let ids: Vec<&BlockId> = restored.blocks.keys().collect();
        assert_eq!(ids, [&text_id, &ruled_id]);
    }

    #[test]
    fn from_json_rejects_documents_missing_required_keys() {
        let complete = Template::new().to_json().expect("serialize");
        for key in REQUIRED_KEYS {
            let mut doc: serde_json::Value = serde_json::from_str(&complete).expect("parse");
            doc.as_object_mut().expect("object").remove(key);
            let err = Template::from_json(&doc.to_string()).expect_err("must reject");
            assert!(matches!(err, TemplateError::MissingKey(k) if k == key));
        }
    }

    #[test]
    fn from_json_rejects_malformed_json() {
        assert!(matches!(
            Template::from_json("{not json"),
            Err(TemplateError::Parse(_))
        ));
    }

    #[test]
    fn add_block_registers_global_options() {
        let mut template = Template::new();
        template.add_block(BlockKind::Text);

        assert!(template.global_options.contains("border_width"));
        assert!(template.global_options.contains("font_size"));
        // The opt-in flag itself is block-local and never promoted.
        assert!(!template.global_options.contains(USE_GLOBAL));
    }

    #[test]
    fn removing_last_declaring_block_sweeps_orphaned_globals() {
        let mut template = Template::new();
        let text_id = template.add_block(BlockKind::Text);
        template.add_block(BlockKind::Grid);

        assert!(template.global_options.contains("font_size"));

        // Only the text block declares font_size; removing it orphans the
        // global, while border options stay (the grid block declares them).
        assert!(template.remove_block(&text_id));
        assert!(!template.global_options.contains("font_size"));
        assert!(template.global_options.contains("border_width"));
    }

    #[test]
    fn set_global_option_updates_only_inheriting_blocks() {
        let mut template = Template::new();
        let opted_in = template.add_block(BlockKind::Text);
        let opted_out = template.add_block(BlockKind::Ruled);

        template
            .blocks
            .get_mut(&opted_out)
            .expect("block")
            .options
            .set(USE_GLOBAL, OptionValue::Flag(false));

        let affected = template.set_global_option("border_width", OptionValue::Number(6.0));
        assert_eq!(affected, vec![opted_in]);

        assert_eq!(
            template.blocks[&opted_in].options.number("border_width"),
            Some(6.0)
        );
        assert_eq!(
            template.blocks[&opted_out].options.number("border_width"),
            Some(2.0)
        );
    }

    #[test]
    fn toggling_use_global_back_on_inherits_current_global_values() {
        let mut template = Template::new();
        let a = template.add_block(BlockKind::Text);
        template.add_block(BlockKind::Text);

        // Opt out, then move the global value while `a` is local.
        template
            .blocks
            .get_mut(&a)
            .expect("block")
            .options
            .set(USE_GLOBAL, OptionValue::Flag(false));
        template.set_global_option("font_size", OptionValue::Number(48.0));
        assert_eq!(template.blocks[&a].options.number("font_size"), Some(32.0));

        let globals = template.global_options.clone();
        let block = template.blocks.get_mut(&a).expect("block");
        block.options.set(USE_GLOBAL, OptionValue::Flag(true));
        block.options.inherit(&globals);

        assert_eq!(block.options.number("font_size"), Some(48.0));
        assert_eq!(block.options.number("border_width"), Some(2.0));
    }

    #[test]
    fn z_order_operations_reorder_the_block_map() {
        let mut template = Template::new();
        let a = template.add_block(BlockKind::Text);
        let b = template.add_block(BlockKind::Ruled);
        let c = template.add_block(BlockKind::Grid);

        template.bring_to_front(&a);
        let ids: Vec<&BlockId> = template.blocks.keys().collect();
        assert_eq!(ids, [&b, &c, &a]);

        template.send_to_back(&c);
        let ids: Vec<&BlockId> = template.blocks.keys().collect();
        assert_eq!(ids, [&c, &b, &a]);
    }

    #[test]
    fn new_blocks_pick_up_current_global_values() {
        let mut template = Template::new();
        template.add_block(BlockKind::Text);
        template.set_global_option("border_width", OptionValue::Number(8.0));

        // Fresh blocks inherit by default, so the new one arrives styled
        // like the rest of the page.
        let fresh = template.add_block(BlockKind::Ruled);
        assert_eq!(
            template.blocks[&fresh].options.number("border_width"),
            Some(8.0)
        );
    }
}

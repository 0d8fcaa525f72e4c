//! Option model: typed option values and the per-block/global option sets.
//!
//! Every block owns an [`OptionSet`]; the editor session owns one more that
//! holds the shared "global" values. Options flagged global can be inherited
//! from the session set by any block whose `use_global` flag is on.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the per-block flag that opts a block into the global values.
pub const USE_GLOBAL: &str = "use_global";

/// The value type an option is declared with. Fixed for the option's lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OptionKind {
    /// Numeric value, edited with a drag-value control.
    #[serde(rename = "number")]
    Number,
    /// Boolean value, edited with a checkbox.
    #[serde(rename = "boolean")]
    Flag,
    /// Free-form text value, edited with a text field.
    #[serde(rename = "string")]
    Text,
}

/// A typed option value. The variant is fixed at declaration and never
/// changes; [`OptionSet::set`] rejects values of a different kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean value.
    Flag(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

impl OptionValue {
    /// Returns the kind tag matching this value's variant.
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Number(_) => OptionKind::Number,
            OptionValue::Flag(_) => OptionKind::Flag,
            OptionValue::Text(_) => OptionKind::Text,
        }
    }

    /// Returns the numeric value, or `None` for other kinds.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean value, or `None` for other kinds.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OptionValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text value, or `None` for other kinds.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A single declared option: its current value, declared kind, default,
/// human-readable form label, and whether it participates in the global set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockOption {
    /// Current value. Invariant: `value.kind() == value_type`.
    pub value: OptionValue,
    /// Declared value kind, fixed for the option's lifetime.
    pub value_type: OptionKind,
    /// Value the option was declared with.
    pub default: OptionValue,
    /// Label shown next to the form control.
    pub label: String,
    /// Whether this option is shared through the global option set.
    pub is_global: bool,
}

impl BlockOption {
    /// Declares a new option with the given default value.
    pub fn new(label: &str, default: OptionValue, is_global: bool) -> Self {
        Self {
            value: default.clone(),
            value_type: default.kind(),
            default,
            label: label.to_string(),
            is_global,
        }
    }
}

/// Insertion-ordered mapping from option name to [`BlockOption`].
///
/// Iteration order is the declaration order, which is also the order the
/// options form renders controls in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct OptionSet(IndexMap<String, BlockOption>);

impl OptionSet {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an option under `name`, replacing any previous declaration.
    pub fn declare(&mut self, name: &str, option: BlockOption) {
        self.0.insert(name.to_string(), option);
    }

    /// Returns the option declared under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&BlockOption> {
        self.0.get(name)
    }

    /// Returns the current value of `name`, if declared.
    pub fn value(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name).map(|opt| &opt.value)
    }

    /// Convenience accessor for numeric option values.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(OptionValue::as_number)
    }

    /// Convenience accessor for text option values.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(OptionValue::as_text)
    }

    /// Sets the value of `name`.
    ///
    /// Returns `false` without mutating when the option is undeclared or the
    /// new value's kind differs from the declared kind.
    pub fn set(&mut self, name: &str, value: OptionValue) -> bool {
        match self.0.get_mut(name) {
            Some(opt) if opt.value_type == value.kind() => {
                opt.value = value;
                true
            }
            _ => false,
        }
    }

    /// Whether this set currently opts into the global values.
    pub fn uses_global(&self) -> bool {
        self.value(USE_GLOBAL)
            .and_then(OptionValue::as_flag)
            .unwrap_or(false)
    }

    /// Adds every global-flagged option of `block_options` that this set does
    /// not declare yet, carrying over its current value.
    pub fn add_global(&mut self, block_options: &OptionSet) {
        for (name, opt) in block_options.iter() {
            if opt.is_global && !self.0.contains_key(name) {
                self.0.insert(name.clone(), opt.clone());
            }
        }
    }

    /// Removes the given option names. Unknown names are ignored.
    pub fn delete<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.0.shift_remove(name.as_ref());
        }
    }

    /// Copies the value of every global-flagged option present in both sets
    /// from `globals` into this set. No-op unless `use_global` is on.
    pub fn inherit(&mut self, globals: &OptionSet) {
        if !self.uses_global() {
            return;
        }
        for (name, opt) in self.0.iter_mut() {
            if !opt.is_global {
                continue;
            }
            if let Some(global) = globals.get(name) {
                if global.value.kind() == opt.value_type {
                    opt.value = global.value.clone();
                }
            }
        }
    }

    /// Applies a global value change to this set.
    ///
    /// Only takes effect when the set currently inherits (`use_global` on)
    /// and declares `name` as a global-flagged option of the matching kind.
    /// Returns whether the value was applied.
    pub fn set_global(&mut self, name: &str, value: &OptionValue) -> bool {
        if !self.uses_global() {
            return false;
        }
        match self.0.get_mut(name) {
            Some(opt) if opt.is_global && opt.value_type == value.kind() => {
                opt.value = value.clone();
                true
            }
            _ => false,
        }
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Declared option names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterates options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BlockOption)> {
        self.0.iter()
    }

    /// Iterates options mutably in declaration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut BlockOption)> {
        self.0.iter_mut()
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no options are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block_set(use_global: bool) -> OptionSet {
        let mut set = OptionSet::new();
        set.declare(
            USE_GLOBAL,
            BlockOption::new("Use global values", OptionValue::Flag(use_global), false),
        );
        set.declare(
            "border_width",
            BlockOption::new("Border width", OptionValue::Number(2.0), true),
        );
        set.declare(
            "title",
            BlockOption::new("Title", OptionValue::Text("Notes".into()), false),
        );
        set
    }

    #[test]
    fn set_rejects_mismatched_kind() {
        let mut set = sample_block_set(false);
        assert!(!set.set("border_width", OptionValue::Text("wide".into())));
        assert_eq!(set.number("border_width"), Some(2.0));

        assert!(set.set("border_width", OptionValue::Number(4.0)));
        assert_eq!(set.number("border_width"), Some(4.0));
    }

    #[test]
    fn set_ignores_undeclared_names() {
        let mut set = sample_block_set(false);
        assert!(!set.set("missing", OptionValue::Number(1.0)));
        assert!(!set.contains("missing"));
    }

    #[test]
    fn add_global_copies_only_global_flagged_options() {
        let block = sample_block_set(false);
        let mut globals = OptionSet::new();
        globals.add_global(&block);

        assert!(globals.contains("border_width"));
        assert!(!globals.contains("title"));
        assert!(!globals.contains(USE_GLOBAL));
        assert_eq!(globals.number("border_width"), Some(2.0));
    }

    #[test]
    fn add_global_keeps_existing_values() {
        let block = sample_block_set(false);
        let mut globals = OptionSet::new();
        globals.declare(
            "border_width",
            BlockOption::new("Border width", OptionValue::Number(9.0), true),
        );
        globals.add_global(&block);
        assert_eq!(globals.number("border_width"), Some(9.0));
    }

    #[test]
    fn inherit_overwrites_global_flagged_values_when_opted_in() {
        let mut block = sample_block_set(true);
        let mut globals = OptionSet::new();
        globals.declare(
            "border_width",
            BlockOption::new("Border width", OptionValue::Number(7.0), true),
        );

        block.inherit(&globals);
        assert_eq!(block.number("border_width"), Some(7.0));
        // Local non-global options are untouched.
        assert_eq!(block.text("title"), Some("Notes"));
    }

    #[test]
    fn inherit_is_a_no_op_without_opt_in() {
        let mut block = sample_block_set(false);
        let mut globals = OptionSet::new();
        globals.declare(
            "border_width",
            BlockOption::new("Border width", OptionValue::Number(7.0), true),
        );

        block.inherit(&globals);
        assert_eq!(block.number("border_width"), Some(2.0));
    }

    #[test]
    fn set_global_only_touches_inheriting_sets() {
        let mut inheriting = sample_block_set(true);
        let mut local = sample_block_set(false);

        let applied = inheriting.set_global("border_width", &OptionValue::Number(5.0));
        assert!(applied);
        assert_eq!(inheriting.number("border_width"), Some(5.0));

        let applied = local.set_global("border_width", &OptionValue::Number(5.0));
        assert!(!applied);
        assert_eq!(local.number("border_width"), Some(2.0));
    }

    #[test]
    fn delete_removes_named_options() {
        let mut set = sample_block_set(false);
        set.delete(["border_width", "never_declared"]);
        assert!(!set.contains("border_width"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let set = sample_block_set(false);
        let names: Vec<&String> = set.names().collect();
        assert_eq!(names, [USE_GLOBAL, "border_width", "title"]);
    }
}

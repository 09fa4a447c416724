//! Bill-of-materials tree produced by the import heuristic.
//!
//! The tree is three levels deep: a [`BomData`] holds [`Block`]s, each block
//! holds [`Section`]s and each section holds [`Item`]s. Ordering at every
//! level mirrors the order of the rows the tree was built from.

use serde::{Deserialize, Serialize};

/// Title given to the block created implicitly before the first item row.
pub const DEFAULT_BLOCK_TITLE: &str = "General Block";

/// Label given to the section created implicitly for item rows that follow
/// no heading.
pub const DEFAULT_SECTION_LABEL: &str = "General Section";

/// Title used for a heading row that carries no readable text.
pub const UNTITLED: &str = "Untitled";

/// A single bill-of-materials line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub module: String,
    pub description: String,
    #[serde(with = "crate::quantity")]
    pub qty: f64,
    /// Checkbox state of the consuming UI. Always `true` on import.
    pub selected: bool,
}

impl Item {
    pub fn new(id: impl Into<String>, module: impl Into<String>, description: impl Into<String>, qty: f64) -> Self {
        Self {
            id: id.into(),
            module: module.into(),
            description: description.into(),
            qty,
            selected: true,
        }
    }
}

/// Consecutive items grouped under one heading inside a block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub id: String,
    pub label: String,
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Select or deselect every item in the section.
    pub fn set_selected(&mut self, selected: bool) {
        for item in &mut self.items {
            item.selected = selected;
        }
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|i| i.selected).count()
    }
}

/// Top-level grouping of the tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub id: String,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Block {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// Root of an imported bill of materials.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BomData {
    pub blocks: Vec<Block>,
}

/// An item together with the block and section it sits in.
#[derive(Debug, Clone, Copy)]
pub struct ItemRef<'a> {
    pub block: &'a Block,
    pub section: &'a Section,
    pub item: &'a Item,
}

impl BomData {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the tree holds no blocks at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn section_count(&self) -> usize {
        self.blocks.iter().map(|b| b.sections.len()).sum()
    }

    pub fn item_count(&self) -> usize {
        self.blocks.iter().map(Block::item_count).sum()
    }

    /// All items in tree order, with their enclosing block and section.
    pub fn items(&self) -> impl Iterator<Item = ItemRef<'_>> {
        self.blocks.iter().flat_map(|block| {
            block.sections.iter().flat_map(move |section| {
                section.items.iter().map(move |item| ItemRef { block, section, item })
            })
        })
    }

    /// Selected items in tree order.
    pub fn selected_items(&self) -> impl Iterator<Item = ItemRef<'_>> {
        self.items().filter(|r| r.item.selected)
    }

    pub fn set_all_selected(&mut self, selected: bool) {
        for section in self.blocks.iter_mut().flat_map(|b| b.sections.iter_mut()) {
            section.set_selected(selected);
        }
    }

    /// Returns `false` when no item carries `id`.
    pub fn set_item_selected(&mut self, id: &str, selected: bool) -> bool {
        let found = self
            .blocks
            .iter_mut()
            .flat_map(|b| b.sections.iter_mut())
            .flat_map(|s| s.items.iter_mut())
            .find(|i| i.id == id);

        match found {
            Some(item) => {
                item.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Returns `false` when no section carries `id`.
    pub fn set_section_selected(&mut self, id: &str, selected: bool) -> bool {
        let found = self
            .blocks
            .iter_mut()
            .flat_map(|b| b.sections.iter_mut())
            .find(|s| s.id == id);

        match found {
            Some(section) => {
                section.set_selected(selected);
                true
            }
            None => false,
        }
    }
}

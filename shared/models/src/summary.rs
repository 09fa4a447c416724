//! Aggregate figures over an imported tree.

use serde::{Deserialize, Serialize};

use crate::bom::BomData;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BomSummary {
    pub blocks: usize,
    pub sections: usize,
    pub items: usize,
    pub selected_items: usize,
    #[serde(with = "crate::quantity")]
    pub total_qty: f64,
    #[serde(with = "crate::quantity")]
    pub selected_qty: f64,
}

impl BomSummary {
    pub fn of(bom: &BomData) -> Self {
        let mut summary = Self {
            blocks: bom.blocks.len(),
            sections: bom.section_count(),
            ..Default::default()
        };

        for entry in bom.items() {
            summary.items += 1;
            summary.total_qty += entry.item.qty;
            if entry.item.selected {
                summary.selected_items += 1;
                summary.selected_qty += entry.item.qty;
            }
        }

        summary
    }

    pub fn has_items(&self) -> bool {
        self.items > 0
    }
}

impl BomData {
    pub fn summary(&self) -> BomSummary {
        BomSummary::of(self)
    }
}

//! Selection Extractor
//!
//! Flattens the selected items of an imported tree into line payloads for
//! quotes, invoices and purchase orders.

use execbom_models::BomData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One line ready to be posted to an invoicing or purchasing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BomLine {
    pub block: String,
    pub section: String,
    pub module: String,
    pub description: String,
    #[serde(with = "execbom_models::quantity")]
    pub qty: f64,
    pub source_item_ids: Vec<String>,
}

/// Selection extractor with optional merging of repeated lines
#[derive(Debug, Clone, Default)]
pub struct SelectionExtractor {
    merge_duplicates: bool,
}

impl SelectionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge lines with the same module and description, summing quantities.
    pub fn with_merge_duplicates(mut self, merge: bool) -> Self {
        self.merge_duplicates = merge;
        self
    }

    /// Selected items in tree order.
    pub fn extract(&self, bom: &BomData) -> Vec<BomLine> {
        let mut lines: Vec<BomLine> = Vec::new();
        let mut seen: HashMap<(String, String), usize> = HashMap::new();

        for entry in bom.selected_items() {
            let item = entry.item;

            if self.merge_duplicates {
                let key = (normalize(&item.module), normalize(&item.description));
                if let Some(&idx) = seen.get(&key) {
                    let line = &mut lines[idx];
                    line.qty += item.qty;
                    line.source_item_ids.push(item.id.clone());
                    continue;
                }
                seen.insert(key, lines.len());
            }

            lines.push(BomLine {
                block: entry.block.title.clone(),
                section: entry.section.label.clone(),
                module: item.module.clone(),
                description: item.description.clone(),
                qty: item.qty,
                source_item_ids: vec![item.id.clone()],
            });
        }

        tracing::debug!(
            lines = lines.len(),
            merged = self.merge_duplicates,
            "Extracted selected BOM lines"
        );
        lines
    }
}

fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::classifier::classify_rows;
    use crate::bom::ids::SequentialIds;

    fn bom() -> BomData {
        classify_rows(
            vec![
                vec!["Phase 1"],
                vec!["Electrical"],
                vec!["Cable", "3 core  1.5mm", "10"],
                vec!["Switch", "2 way", "4"],
                vec!["Mechanical"],
                vec!["CABLE", "3 core 1.5mm", "5"],
            ],
            SequentialIds::new("t"),
        )
    }

    #[test]
    fn test_extracts_selected_lines_with_context() {
        let mut bom = bom();
        let switch_id = bom.items().find(|r| r.item.module == "Switch").unwrap().item.id.clone();
        bom.set_item_selected(&switch_id, false);

        let lines = SelectionExtractor::new().extract(&bom);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].block, "Phase 1");
        assert_eq!(lines[0].section, "Electrical");
        assert_eq!(lines[0].qty, 10.0);
        assert_eq!(lines[1].section, "Mechanical");
        assert_eq!(lines[1].module, "CABLE");
    }

    #[test]
    fn test_merge_duplicates_sums_quantities() {
        let lines = SelectionExtractor::new().with_merge_duplicates(true).extract(&bom());

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].module, "Cable");
        assert_eq!(lines[0].qty, 15.0);
        assert_eq!(lines[0].source_item_ids.len(), 2);
        assert_eq!(lines[1].module, "Switch");
    }

    #[test]
    fn test_nothing_selected() {
        let mut bom = bom();
        bom.set_all_selected(false);
        assert!(SelectionExtractor::new().extract(&bom).is_empty());
    }
}

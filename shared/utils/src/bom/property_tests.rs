//! Property-based tests for the BOM classifier.

use proptest::prelude::*;

use super::classifier::{classify_row, classify_rows, RowKind};
use super::ids::SequentialIds;
use super::parser::parse_pasted_text;

fn arb_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("  ".to_string()),
        Just("Module".to_string()),
        Just("Description".to_string()),
        "[A-Za-z]{1,8}",
        "-?[0-9]{1,3}(\\.[0-9]{1,2})?",
        "[ A-Za-z0-9\\.]{0,12}",
    ]
}

fn arb_grid() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(arb_cell(), 0..5), 0..40)
}

fn item_row_count(grid: &[Vec<String>]) -> usize {
    grid.iter()
        .filter(|row| matches!(classify_row(row.as_slice()), RowKind::Item { .. }))
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any grid, however messy, produces a tree with at most one block and
    /// no unnamed groups.
    #[test]
    fn property_classifier_is_total(grid in arb_grid()) {
        let bom = classify_rows(&grid, SequentialIds::default());
        prop_assert!(bom.blocks.len() <= 1);
        for block in &bom.blocks {
            prop_assert!(!block.title.is_empty());
            for section in &block.sections {
                prop_assert!(!section.label.is_empty());
            }
        }
    }

    #[test]
    fn property_items_match_item_rows(grid in arb_grid()) {
        let bom = classify_rows(&grid, SequentialIds::default());
        prop_assert_eq!(bom.item_count(), item_row_count(&grid));
    }

    /// Each non-skipped row creates at most one block, section or item.
    #[test]
    fn property_one_entity_per_row(grid in arb_grid()) {
        let bom = classify_rows(&grid, SequentialIds::default());
        let counted_rows = grid
            .iter()
            .filter(|row| !matches!(classify_row(row.as_slice()), RowKind::Blank | RowKind::ColumnLabels))
            .count();
        let entities = bom.blocks.len() + bom.section_count() + bom.item_count();
        // Lazily created default groups account for at most two extra entities.
        prop_assert!(entities <= counted_rows + 2);
    }

    /// Items come out in the order their rows went in.
    #[test]
    fn property_items_keep_row_order(modules in prop::collection::vec("[A-Z][a-z]{2,6}", 1..20), split in 0usize..20) {
        let mut grid: Vec<Vec<String>> = modules
            .iter()
            .map(|m| vec![m.clone(), format!("{} part", m), "2".to_string()])
            .collect();
        let split = split.min(grid.len());
        grid.insert(split, vec!["Heading".to_string()]);

        let bom = classify_rows(&grid, SequentialIds::default());
        let seen: Vec<String> = bom.items().map(|r| r.item.module.clone()).collect();
        prop_assert_eq!(seen, modules);
    }

    /// Once a block exists, further headings only ever open sections.
    #[test]
    fn property_single_block_ceiling(headings in prop::collection::vec("[A-Z][a-z]{2,10}", 1..10)) {
        let text = headings
            .iter()
            .map(|h| format!("{}\nX\tY\t1", h))
            .collect::<Vec<_>>()
            .join("\n");
        let bom = classify_rows(parse_pasted_text(&text), SequentialIds::default());

        prop_assert_eq!(bom.blocks.len(), 1);
        prop_assert_eq!(&bom.blocks[0].title, &headings[0]);
        let labels: Vec<&String> = bom.blocks[0].sections.iter().map(|s| &s.label).collect();
        prop_assert_eq!(labels.len(), headings.len());
        prop_assert_eq!(labels[0], "General Section");
        for (label, heading) in labels[1..].iter().zip(&headings[1..]) {
            prop_assert_eq!(*label, heading);
        }
    }
}

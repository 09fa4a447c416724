//! BOM Heuristic Classifier
//!
//! Turns a loosely structured grid of cells into a Block → Section → Item
//! tree. Every row is classified on its own ([`classify_row`]) and the
//! hierarchy is built by folding the classified rows into a [`ScanState`].
//!
//! The classifier has no error path. Missing cells, unreadable quantities
//! and ambiguous headings are absorbed by defaults so that any fragment a
//! user pastes yields a usable tree.

use execbom_models::{Block, BomData, Item, Section, DEFAULT_BLOCK_TITLE, DEFAULT_SECTION_LABEL, UNTITLED};
use serde::{Deserialize, Serialize};

use super::coerce::{cell_text, first_non_blank, non_blank_count, parse_quantity};
use super::ids::{IdGenerator, UuidGenerator};

/// What a single row contributes to the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    /// No cells, or only whitespace.
    Blank,
    /// A "Module | Description | ..." column-label row.
    ColumnLabels,
    /// Two or more filled cells.
    Item { module: String, description: String, qty: f64, qty_fell_back: bool },
    /// Fewer than two filled cells: a block or section heading.
    Heading { title: String },
}

/// Classify one row without looking at its neighbours.
pub fn classify_row<S: AsRef<str>>(cells: &[S]) -> RowKind {
    let filled = non_blank_count(cells);
    if filled == 0 {
        return RowKind::Blank;
    }

    if is_column_label_row(cells) {
        return RowKind::ColumnLabels;
    }

    if filled >= 2 {
        let qty = parse_quantity(cells.get(2).map(|c| c.as_ref()));
        return RowKind::Item {
            module: cell_text(cells, 0).to_string(),
            description: cell_text(cells, 1).to_string(),
            qty: qty.value,
            qty_fell_back: qty.fell_back,
        };
    }

    let title = match cell_text(cells, 0) {
        "" => first_non_blank(cells).unwrap_or(UNTITLED),
        first => first,
    };
    RowKind::Heading { title: title.to_string() }
}

fn is_column_label_row<S: AsRef<str>>(cells: &[S]) -> bool {
    let first = cell_text(cells, 0).to_lowercase();
    let second = cell_text(cells, 1).to_lowercase();

    (first.contains("module") || first.contains("item"))
        && (second.contains("description") || second.contains("desc"))
}

/// Counters describing how a grid was interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub rows_seen: usize,
    pub blank_rows: usize,
    pub label_rows: usize,
    pub heading_rows: usize,
    pub item_rows: usize,
    /// Item rows whose quantity cell had content but no usable number.
    pub defaulted_quantities: usize,
}

/// Accumulator threaded through the fold over rows.
///
/// `current_block` is `None` until the first heading or item row.
/// `current_section` is cleared whenever a block is opened so that the next
/// item row opens the default section under it.
struct ScanState<G> {
    ids: G,
    blocks: Vec<Block>,
    current_block: Option<usize>,
    current_section: Option<usize>,
    report: ClassificationReport,
}

impl<G: IdGenerator> ScanState<G> {
    fn new(ids: G) -> Self {
        Self {
            ids,
            blocks: Vec::new(),
            current_block: None,
            current_section: None,
            report: ClassificationReport::default(),
        }
    }

    fn apply(mut self, kind: RowKind) -> Self {
        self.report.rows_seen += 1;

        match kind {
            RowKind::Blank => self.report.blank_rows += 1,
            RowKind::ColumnLabels => self.report.label_rows += 1,
            RowKind::Heading { title } => {
                self.report.heading_rows += 1;
                self.open_heading(title);
            }
            RowKind::Item { module, description, qty, qty_fell_back } => {
                self.report.item_rows += 1;
                if qty_fell_back {
                    self.report.defaulted_quantities += 1;
                }
                let item = Item::new(self.ids.next_id(), module, description, qty);
                self.push_item(item);
            }
        }

        self
    }

    /// The first heading opens a block; every later heading opens a section
    /// in the current block.
    fn open_heading(&mut self, title: String) {
        match self.current_block {
            None => self.open_block(title),
            Some(block) => self.open_section(block, title),
        };
    }

    fn open_block(&mut self, title: String) -> usize {
        self.blocks.push(Block::new(self.ids.next_id(), title));
        let idx = self.blocks.len() - 1;
        self.current_block = Some(idx);
        self.current_section = None;
        idx
    }

    fn open_section(&mut self, block: usize, label: String) -> usize {
        let section = Section::new(self.ids.next_id(), label);
        let sections = &mut self.blocks[block].sections;
        sections.push(section);
        let idx = sections.len() - 1;
        self.current_section = Some(idx);
        idx
    }

    fn push_item(&mut self, item: Item) {
        let block = match self.current_block {
            Some(block) => block,
            None => self.open_block(DEFAULT_BLOCK_TITLE.to_string()),
        };
        let section = match self.current_section {
            Some(section) => section,
            None => self.open_section(block, DEFAULT_SECTION_LABEL.to_string()),
        };
        self.blocks[block].sections[section].items.push(item);
    }

    fn finish(self) -> (BomData, ClassificationReport) {
        (BomData { blocks: self.blocks }, self.report)
    }
}

/// Build a tree from `rows`, allocating identifiers from `ids`.
pub fn classify_rows<I, R, S, G>(rows: I, ids: G) -> BomData
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
    G: IdGenerator,
{
    classify_with_report(rows, ids).0
}

/// Like [`classify_rows`], also returning per-row-kind counters.
pub fn classify_with_report<I, R, S, G>(rows: I, ids: G) -> (BomData, ClassificationReport)
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
    G: IdGenerator,
{
    let (bom, report) = rows
        .into_iter()
        .map(|row| classify_row(row.as_ref()))
        .fold(ScanState::new(ids), ScanState::apply)
        .finish();

    tracing::debug!(
        rows = report.rows_seen,
        blocks = bom.blocks.len(),
        sections = bom.section_count(),
        items = report.item_rows,
        skipped = report.blank_rows + report.label_rows,
        defaulted_quantities = report.defaulted_quantities,
        "Classified BOM grid"
    );

    (bom, report)
}

/// Build a tree with random UUID identifiers.
pub fn classify<I, R, S>(rows: I) -> BomData
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    classify_rows(rows, UuidGenerator)
}

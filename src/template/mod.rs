mod block;
mod coords;
mod mapping;
mod matcher;
pub mod splice;

pub use block::{Materialized, locate_block, materialize};
pub use coords::{CoordinateMap, Position};
pub use mapping::{Mapping, normalize_newlines};
pub use matcher::{Match, find_matches};

use crate::model::{Document, Paragraph};

/// Replace every token of `mapping` in one paragraph, keeping run formatting.
///
/// Returns the number of replacements made.
pub fn substitute_paragraph(paragraph: &mut Paragraph, mapping: &Mapping) -> usize {
    let mut runs = paragraph.runs_mut();
    if runs.is_empty() {
        return 0;
    }
    let map = CoordinateMap::build(runs.iter().map(|r| r.text()));
    if map.is_empty() {
        return 0;
    }
    let matches = find_matches(map.view(), mapping);
    let count = matches.len();
    if count > 0 {
        splice::apply(&mut runs, &map, matches);
    }
    count
}

/// Apply `mapping` to body paragraphs and table cell paragraphs.
pub fn substitute_document(doc: &mut Document, mapping: &Mapping) -> usize {
    let mut total = 0;
    for id in doc.all_paragraphs() {
        total += substitute_paragraph(doc.paragraph_mut(id), mapping);
    }
    total
}

/// Repeating block description: sentinels plus one mapping per instance.
#[derive(Clone, Debug, Default)]
pub struct RepeatingBlock {
    pub start: String,
    pub end: String,
    pub items: Vec<Mapping>,
}

/// Everything needed to fill one template.
#[derive(Clone, Debug, Default)]
pub struct Fill {
    pub values: Mapping,
    pub block: Option<RepeatingBlock>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillReport {
    pub paragraphs: usize,
    pub replacements: usize,
    pub instances: usize,
}

impl Fill {
    pub fn new(values: Mapping) -> Self {
        Self {
            values,
            block: None,
        }
    }

    pub fn with_block(mut self, block: RepeatingBlock) -> Self {
        self.block = Some(block);
        self
    }

    /// Materialize the repeating block, then substitute the flat values everywhere.
    ///
    /// The block goes first because it changes which paragraphs exist.
    pub fn apply(&self, doc: &mut Document) -> FillReport {
        let mut report = FillReport::default();
        if let Some(block) = &self.block {
            let materialized = materialize(doc, &block.start, &block.end, &block.items);
            report.instances = materialized.instances;
            report.replacements += materialized.replacements;
        }
        report.paragraphs = doc.all_paragraphs().len();
        report.replacements += substitute_document(doc, &self.values);
        log::debug!(
            "Filled {} paragraph(s): {} replacement(s), {} block instance(s)",
            report.paragraphs,
            report.replacements,
            report.instances
        );
        report
    }
}

use std::ops::Range;

use crate::model::{Document, Paragraph, ParagraphId};

use super::{Mapping, substitute_paragraph};

/// Half-open range over [`Document::top_level_paragraphs`] covering the block.
///
/// Starts at the first paragraph containing `start` and stops before the next
/// paragraph containing `end`, or runs to the end of the document. An empty
/// `end` never matches.
pub fn locate_block(doc: &Document, start: &str, end: &str) -> Option<Range<usize>> {
    let texts = doc.texts();
    let first = texts.iter().position(|t| t.contains(start))?;
    let last = texts[first + 1..]
        .iter()
        .position(|t| !end.is_empty() && t.contains(end))
        .map_or(texts.len(), |i| first + 1 + i);
    Some(first..last)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Materialized {
    pub instances: usize,
    pub inserted: usize,
    pub replacements: usize,
}

enum InsertPoint {
    Before(ParagraphId),
    After(ParagraphId),
}

impl InsertPoint {
    fn insert(&mut self, doc: &mut Document, paragraph: Paragraph) -> ParagraphId {
        match *self {
            InsertPoint::Before(anchor) => doc.insert_before(anchor, paragraph),
            InsertPoint::After(anchor) => {
                let id = doc.insert_after(anchor, paragraph);
                *self = InsertPoint::After(id);
                id
            }
        }
    }
}

/// Fill the repeating block once per item.
///
/// Item 0 is written into the block in place. Every later item gets a fresh
/// copy of the untouched block, preceded by an empty separator paragraph that
/// takes the style of the block's last paragraph. With no items, or no start
/// sentinel, the document is left as is.
pub fn materialize(doc: &mut Document, start: &str, end: &str, items: &[Mapping]) -> Materialized {
    let Some((first_item, rest)) = items.split_first() else {
        log::debug!("No repeating items; block {start:?} left untouched");
        return Materialized::default();
    };
    let Some(range) = locate_block(doc, start, end) else {
        log::warn!("Repeating block start {start:?} not found; {} item(s) ignored", items.len());
        return Materialized::default();
    };
    log::debug!(
        "Repeating block {start:?}..{end:?} at paragraphs {}..{}",
        range.start,
        range.end
    );

    let ids = doc.top_level_paragraphs();
    let block = &ids[range.clone()];
    let pristine: Vec<Paragraph> = block.iter().map(|&id| doc.clone_paragraph(id)).collect();

    let mut result = Materialized {
        instances: 1,
        ..Materialized::default()
    };
    for &id in block {
        result.replacements += substitute_paragraph(doc.paragraph_mut(id), first_item);
    }

    let separator_style = pristine.last().and_then(|p| p.style()).map(str::to_owned);
    let mut cursor = match ids.get(range.end) {
        Some(&next) => InsertPoint::Before(next),
        None => InsertPoint::After(block[block.len() - 1]),
    };

    for mapping in rest {
        cursor.insert(doc, Paragraph::empty_with_style(separator_style.clone()));
        for source in &pristine {
            let mut clone = source.clone();
            result.replacements += substitute_paragraph(&mut clone, mapping);
            cursor.insert(doc, clone);
        }
        result.inserted += pristine.len() + 1;
        result.instances += 1;
    }
    result
}

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

use crate::error::Error;
use crate::model::{BodyNode, Document, Inline, Paragraph, Row, RowChild, Run, Table, TableChild};

use super::{DOCUMENT_PART, Part};

/// Characters allowed by XML 1.0; anything else in replacement text is dropped.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn flush_text(out: &mut String, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    out.push_str("<w:t xml:space=\"preserve\">");
    escape_into(out, pending);
    out.push_str("</w:t>");
    pending.clear();
}

/// Run text as `w:t` segments, with tabs and newlines as `w:tab` and `w:br`.
fn write_run_text(out: &mut String, text: &str) {
    let mut pending = String::new();
    for c in text.chars() {
        match c {
            '\t' => {
                flush_text(out, &mut pending);
                out.push_str("<w:tab/>");
            }
            '\n' => {
                flush_text(out, &mut pending);
                out.push_str("<w:br/>");
            }
            _ => pending.push(c),
        }
    }
    flush_text(out, &mut pending);
}

fn write_run(out: &mut String, run: &Run) {
    out.push_str(&run.shell.open);
    if let Some(props) = &run.properties {
        out.push_str(props);
    }
    match &run.source {
        Some(source) => out.push_str(source),
        None => write_run_text(out, run.text()),
    }
    out.push_str(&run.shell.close);
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph) {
    out.push_str(&paragraph.shell.open);
    let props = &paragraph.properties;
    if props.style.is_some() || !props.rest.is_empty() {
        out.push_str("<w:pPr>");
        if let Some(style) = &props.style {
            out.push_str("<w:pStyle w:val=\"");
            escape_into(out, style);
            out.push_str("\"/>");
        }
        out.push_str(&props.rest);
        out.push_str("</w:pPr>");
    }
    for inline in &paragraph.inlines {
        match inline {
            Inline::Run(run) => write_run(out, run),
            Inline::Opaque(markup) => out.push_str(markup),
        }
    }
    out.push_str(&paragraph.shell.close);
}

fn write_row(out: &mut String, doc: &Document, row: &Row) {
    out.push_str(&row.shell.open);
    for child in &row.children {
        match child {
            RowChild::Cell(cell) => {
                out.push_str(&cell.shell.open);
                write_nodes(out, doc, &cell.content);
                out.push_str(&cell.shell.close);
            }
            RowChild::Opaque(markup) => out.push_str(markup),
        }
    }
    out.push_str(&row.shell.close);
}

fn write_table(out: &mut String, doc: &Document, table: &Table) {
    out.push_str(&table.shell.open);
    for child in &table.children {
        match child {
            TableChild::Row(row) => write_row(out, doc, row),
            TableChild::Opaque(markup) => out.push_str(markup),
        }
    }
    out.push_str(&table.shell.close);
}

fn write_nodes(out: &mut String, doc: &Document, nodes: &[BodyNode]) {
    for node in nodes {
        match node {
            BodyNode::Paragraph(id) => write_paragraph(out, doc.paragraph(*id)),
            BodyNode::Table(table) => write_table(out, doc, table),
            BodyNode::Opaque(markup) => out.push_str(markup),
        }
    }
}

pub(super) fn write_document(head: &str, doc: &Document, tail: &str) -> String {
    let mut out = String::with_capacity(head.len() + tail.len() + 64 * 1024);
    out.push_str(head);
    write_nodes(&mut out, doc, &doc.body);
    out.push_str(tail);
    out
}

/// Repack every part in archive order, swapping in the new main document.
pub(super) fn write_package(parts: &[Part], document_xml: &str) -> Result<Vec<u8>, Error> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for part in parts {
        let options = SimpleFileOptions::default().compression_method(part.compression);
        if part.is_dir {
            zip.add_directory(part.name.as_str(), options)?;
            continue;
        }
        zip.start_file(part.name.as_str(), options)?;
        if part.name == DOCUMENT_PART {
            zip.write_all(document_xml.as_bytes())?;
        } else {
            zip.write_all(&part.data)?;
        }
    }
    Ok(zip.finish()?.into_inner())
}

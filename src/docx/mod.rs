mod writer;

use std::io::{Cursor, Read};
use std::path::Path;

use zip::CompressionMethod;

use crate::error::Error;
use crate::model::{
    BodyNode, Cell, Document, Inline, Paragraph, ParagraphProperties, Row, RowChild, Run, Shell,
    Table, TableChild,
};

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const DOCUMENT_PART: &str = "word/document.xml";

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WML_NS)
}

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

fn raw<'a>(xml: &'a str, node: roxmltree::Node) -> &'a str {
    &xml[node.range()]
}

/// Qualified element name from the start of its raw markup, e.g. `w:p` from `<w:p w:rsidR="..">`.
fn qualified_name(markup: &str) -> &str {
    markup
        .trim_start_matches('<')
        .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .next()
        .unwrap_or_default()
}

/// Split an element's markup into verbatim start and end tags.
fn shell(xml: &str, node: roxmltree::Node) -> Shell {
    let range = node.range();
    if let (Some(first), Some(last)) = (node.first_child(), node.last_child()) {
        return Shell::new(
            &xml[range.start..first.range().start],
            &xml[last.range().end..range.end],
        );
    }
    let markup = &xml[range];
    let close = format!("</{}>", qualified_name(markup));
    match markup.strip_suffix("/>") {
        Some(open) => Shell::new(format!("{}>", open.trim_end()), close),
        None => {
            let split = markup.rfind("</").unwrap_or(markup.len());
            Shell::new(&markup[..split], close)
        }
    }
}

/// One ZIP entry of the package, kept byte-for-byte unless it is the main document.
#[derive(Clone, Debug)]
pub(crate) struct Part {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// A DOCX package: the parsed main document plus every other part untouched.
#[derive(Clone, Debug)]
pub struct Package {
    pub document: Document,
    /// `word/document.xml` up to and including the `w:body` start tag.
    head: String,
    /// `word/document.xml` from the `w:body` end tag on.
    tail: String,
    parts: Vec<Part>,
}

impl Package {
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Raw bytes of a package part other than the main document.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name && p.name != DOCUMENT_PART)
            .map(|p| p.data.as_slice())
    }

    /// Serialize the main document back to WordprocessingML.
    pub fn document_xml(&self) -> String {
        writer::write_document(&self.head, &self.document, &self.tail)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        writer::write_package(&self.parts, &self.document_xml())
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })
    }
}

pub fn parse(path: &Path) -> Result<Package, Error> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_bytes(&bytes)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Package, Error> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;

    let mut parts = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        let compression = match entry.compression() {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        parts.push(Part {
            name: entry.name().to_string(),
            data,
            compression,
            is_dir: entry.is_dir(),
        });
    }

    let document_part = parts
        .iter()
        .find(|p| p.name == DOCUMENT_PART)
        .ok_or_else(|| {
            Error::InvalidDocx("missing word/document.xml (is this a DOCX file?)".into())
        })?;
    let xml_content = std::str::from_utf8(&document_part.data)
        .map_err(|_| Error::InvalidDocx("word/document.xml is not UTF-8".into()))?;

    let (head, document, tail) = parse_document_xml(xml_content)?;
    log::debug!(
        "Parsed {} paragraph(s) from {} package part(s)",
        document.all_paragraphs().len(),
        parts.len()
    );
    Ok(Package {
        document,
        head,
        tail,
        parts,
    })
}

fn parse_document_xml(xml_content: &str) -> Result<(String, Document, String), Error> {
    let xml = roxmltree::Document::parse(xml_content)?;
    let root = xml.root_element();
    // Paragraphs and runs the writer creates are spelled with the `w` prefix.
    if root.lookup_prefix(WML_NS) != Some("w") {
        return Err(Error::InvalidDocx(
            "WordprocessingML namespace is not bound to prefix `w`".into(),
        ));
    }
    let body = wml(root, "body").ok_or_else(|| Error::InvalidDocx("Missing w:body".into()))?;

    let body_shell = shell(xml_content, body);
    let head = format!("{}{}", &xml_content[..body.range().start], body_shell.open);
    let tail = format!("{}{}", body_shell.close, &xml_content[body.range().end..]);

    let mut document = Document::new();
    let nodes = parse_block_nodes(xml_content, body, &mut document);
    document.body = nodes;
    Ok((head, document, tail))
}

fn parse_block_nodes(xml: &str, parent: roxmltree::Node, doc: &mut Document) -> Vec<BodyNode> {
    parent
        .children()
        .map(|child| {
            if is_wml(child, "p") {
                BodyNode::Paragraph(doc.add_paragraph(parse_paragraph(xml, child)))
            } else if is_wml(child, "tbl") {
                BodyNode::Table(parse_table(xml, child, doc))
            } else {
                BodyNode::Opaque(raw(xml, child).to_string())
            }
        })
        .collect()
}

fn parse_table(xml: &str, node: roxmltree::Node, doc: &mut Document) -> Table {
    let children = node
        .children()
        .map(|child| {
            if is_wml(child, "tr") {
                TableChild::Row(parse_row(xml, child, doc))
            } else {
                TableChild::Opaque(raw(xml, child).to_string())
            }
        })
        .collect();
    Table {
        shell: shell(xml, node),
        children,
    }
}

fn parse_row(xml: &str, node: roxmltree::Node, doc: &mut Document) -> Row {
    let children = node
        .children()
        .map(|child| {
            if is_wml(child, "tc") {
                RowChild::Cell(Cell {
                    shell: shell(xml, child),
                    content: parse_block_nodes(xml, child, doc),
                })
            } else {
                RowChild::Opaque(raw(xml, child).to_string())
            }
        })
        .collect();
    Row {
        shell: shell(xml, node),
        children,
    }
}

fn parse_paragraph(xml: &str, node: roxmltree::Node) -> Paragraph {
    let mut properties = ParagraphProperties::default();
    let mut inlines = Vec::new();
    for child in node.children() {
        if is_wml(child, "pPr") {
            properties = parse_paragraph_properties(xml, child);
        } else if is_wml(child, "r")
            && let Some(run) = parse_run(xml, child)
        {
            inlines.push(Inline::Run(run));
        } else {
            inlines.push(Inline::Opaque(raw(xml, child).to_string()));
        }
    }
    Paragraph {
        shell: shell(xml, node),
        properties,
        inlines,
    }
}

fn parse_paragraph_properties(xml: &str, ppr: roxmltree::Node) -> ParagraphProperties {
    ParagraphProperties {
        style: wml_attr(ppr, "pStyle").map(str::to_string),
        rest: ppr
            .children()
            .filter(|n| !is_wml(*n, "pStyle"))
            .map(|n| raw(xml, n))
            .collect(),
    }
}

/// A text run, or `None` when the run holds anything besides text, tabs and line breaks.
fn parse_run(xml: &str, node: roxmltree::Node) -> Option<Run> {
    let mut properties = None;
    let mut text = String::new();
    let mut source = String::new();
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(WML_NS) {
            return None;
        }
        match child.tag_name().name() {
            "rPr" => properties = Some(raw(xml, child).to_string()),
            "t" => text.push_str(child.text().unwrap_or_default()),
            "tab" => text.push('\t'),
            "br" if child
                .attribute((WML_NS, "type"))
                .is_none_or(|t| t == "textWrapping") =>
            {
                text.push('\n')
            }
            "cr" => text.push('\n'),
            // Layout cache written by Word; lost only when the run is rebuilt.
            "lastRenderedPageBreak" => {}
            _ => return None,
        }
        if !is_wml(child, "rPr") {
            source.push_str(raw(xml, child));
        }
    }
    let mut run = Run::new(text);
    run.shell = shell(xml, node);
    run.properties = properties;
    run.source = Some(source);
    Some(run)
}

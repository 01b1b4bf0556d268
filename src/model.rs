/// Stable handle to a paragraph stored in a [`Document`] arena.
///
/// Ids stay valid across insertions, so they can serve as insertion anchors
/// while the body is being rewritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParagraphId(usize);

/// Verbatim start and end tags of an element whose children are rebuilt on write.
#[derive(Clone, Debug, PartialEq)]
pub struct Shell {
    pub open: String,
    pub close: String,
}

impl Shell {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    fn wml(name: &str) -> Self {
        Self::new(format!("<w:{name}>"), format!("</w:{name}>"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub shell: Shell,
    /// Raw `w:rPr` element. Copied wholesale, never interpreted.
    pub properties: Option<String>,
    text: String,
    /// Content markup after `w:rPr` as read from the package, until the text changes.
    pub(crate) source: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            shell: Shell::wml("r"),
            properties: None,
            text: text.into(),
            source: None,
        }
    }

    pub fn with_properties(text: impl Into<String>, properties: impl Into<String>) -> Self {
        Self {
            properties: Some(properties.into()),
            ..Self::new(text)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.source = None;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Run(Run),
    /// Paragraph content kept as-is: hyperlinks, bookmarks, field runs, drawings.
    Opaque(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphProperties {
    /// `w:pStyle/@w:val`
    pub style: Option<String>,
    /// Everything in `w:pPr` after `w:pStyle`, verbatim.
    pub rest: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    pub shell: Shell,
    pub properties: ParagraphProperties,
    pub inlines: Vec<Inline>,
}

impl Default for Paragraph {
    fn default() -> Self {
        Self {
            shell: Shell::wml("p"),
            properties: ParagraphProperties::default(),
            inlines: Vec::new(),
        }
    }
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_runs(runs: impl IntoIterator<Item = Run>) -> Self {
        Self {
            inlines: runs.into_iter().map(Inline::Run).collect(),
            ..Self::default()
        }
    }

    /// Empty paragraph carrying only a style reference.
    pub fn empty_with_style(style: Option<String>) -> Self {
        let mut p = Self::default();
        p.set_style(style);
        p
    }

    pub fn style(&self) -> Option<&str> {
        self.properties.style.as_deref()
    }

    pub fn set_style(&mut self, style: Option<String>) {
        self.properties.style = style;
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.inlines.iter().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Opaque(_) => None,
        })
    }

    pub fn runs_mut(&mut self) -> Vec<&mut Run> {
        self.inlines
            .iter_mut()
            .filter_map(|inline| match inline {
                Inline::Run(run) => Some(run),
                Inline::Opaque(_) => None,
            })
            .collect()
    }

    pub fn run_texts(&self) -> Vec<&str> {
        self.runs().map(Run::text).collect()
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs().map(Run::text).collect()
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub shell: Shell,
    pub content: Vec<BodyNode>,
}

#[derive(Clone, Debug)]
pub enum RowChild {
    Cell(Cell),
    Opaque(String),
}

#[derive(Clone, Debug)]
pub struct Row {
    pub shell: Shell,
    pub children: Vec<RowChild>,
}

#[derive(Clone, Debug)]
pub enum TableChild {
    Row(Row),
    Opaque(String),
}

#[derive(Clone, Debug)]
pub struct Table {
    pub shell: Shell,
    pub children: Vec<TableChild>,
}

impl Table {
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.children.iter().filter_map(|c| match c {
            TableChild::Row(row) => Some(row),
            TableChild::Opaque(_) => None,
        })
    }
}

impl Row {
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.children.iter().filter_map(|c| match c {
            RowChild::Cell(cell) => Some(cell),
            RowChild::Opaque(_) => None,
        })
    }
}

#[derive(Clone, Debug)]
pub enum BodyNode {
    Paragraph(ParagraphId),
    Table(Table),
    /// Section properties, content controls and anything else kept verbatim.
    Opaque(String),
}

fn collect_paragraphs(nodes: &[BodyNode], out: &mut Vec<ParagraphId>) {
    for node in nodes {
        match node {
            BodyNode::Paragraph(id) => out.push(*id),
            BodyNode::Table(table) => {
                for cell in table.rows().flat_map(Row::cells) {
                    collect_paragraphs(&cell.content, out);
                }
            }
            BodyNode::Opaque(_) => {}
        }
    }
}

/// Paragraph arena plus the ordered body tree referencing it.
#[derive(Clone, Debug, Default)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
    pub body: Vec<BodyNode>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a paragraph in the arena without placing it in the body.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) -> ParagraphId {
        self.paragraphs.push(paragraph);
        ParagraphId(self.paragraphs.len() - 1)
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) -> ParagraphId {
        let id = self.add_paragraph(paragraph);
        self.body.push(BodyNode::Paragraph(id));
        id
    }

    /// Append a table built from rows of cells of paragraphs.
    pub fn push_table(&mut self, rows: Vec<Vec<Vec<Paragraph>>>) -> Vec<Vec<Vec<ParagraphId>>> {
        let mut ids = Vec::with_capacity(rows.len());
        let mut children = Vec::with_capacity(rows.len());
        for row in rows {
            let mut row_ids = Vec::with_capacity(row.len());
            let mut cells = Vec::with_capacity(row.len());
            for cell in row {
                let cell_ids: Vec<ParagraphId> =
                    cell.into_iter().map(|p| self.add_paragraph(p)).collect();
                cells.push(RowChild::Cell(Cell {
                    shell: Shell::wml("tc"),
                    content: cell_ids.iter().copied().map(BodyNode::Paragraph).collect(),
                }));
                row_ids.push(cell_ids);
            }
            children.push(TableChild::Row(Row {
                shell: Shell::wml("tr"),
                children: cells,
            }));
            ids.push(row_ids);
        }
        self.body.push(BodyNode::Table(Table {
            shell: Shell::wml("tbl"),
            children,
        }));
        ids
    }

    pub fn paragraph(&self, id: ParagraphId) -> &Paragraph {
        &self.paragraphs[id.0]
    }

    pub fn paragraph_mut(&mut self, id: ParagraphId) -> &mut Paragraph {
        &mut self.paragraphs[id.0]
    }

    /// Independent deep copy of a paragraph, not yet placed anywhere.
    pub fn clone_paragraph(&self, id: ParagraphId) -> Paragraph {
        self.paragraph(id).clone()
    }

    /// Top-level body paragraphs in document order.
    pub fn top_level_paragraphs(&self) -> Vec<ParagraphId> {
        self.body
            .iter()
            .filter_map(|node| match node {
                BodyNode::Paragraph(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Every paragraph in document order, including those nested in table cells.
    pub fn all_paragraphs(&self) -> Vec<ParagraphId> {
        let mut out = Vec::new();
        collect_paragraphs(&self.body, &mut out);
        out
    }

    pub fn texts(&self) -> Vec<String> {
        self.top_level_paragraphs()
            .into_iter()
            .map(|id| self.paragraph(id).text())
            .collect()
    }

    fn body_index(&self, anchor: ParagraphId) -> usize {
        self.body
            .iter()
            .position(|node| matches!(node, BodyNode::Paragraph(id) if *id == anchor))
            .unwrap_or_else(|| panic!("{anchor:?} is not a live top-level paragraph"))
    }

    pub fn insert_before(&mut self, anchor: ParagraphId, paragraph: Paragraph) -> ParagraphId {
        let index = self.body_index(anchor);
        let id = self.add_paragraph(paragraph);
        self.body.insert(index, BodyNode::Paragraph(id));
        id
    }

    pub fn insert_after(&mut self, anchor: ParagraphId, paragraph: Paragraph) -> ParagraphId {
        let index = self.body_index(anchor);
        let id = self.add_paragraph(paragraph);
        self.body.insert(index + 1, BodyNode::Paragraph(id));
        id
    }
}

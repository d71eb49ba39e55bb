/// Structural document tree produced by the reader and consumed by the writer.
///
/// A [`Document`] is an ordered list of [`Node`]s plus core [`Metadata`].
/// Each node variant carries only the fields that make sense for it: only
/// headings have a heading level, only list items carry numbering info, and
/// only tables have rows.
use crate::common::Metadata;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Lowest heading level.
pub const MIN_HEADING_LEVEL: u8 = 1;
/// Highest heading level.
pub const MAX_HEADING_LEVEL: u8 = 9;

/// A contiguous span of uniformly formatted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    /// Create an unformatted run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    /// Set the bold flag.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the italic flag.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Whether the run carries any formatting.
    #[inline]
    pub fn is_formatted(&self) -> bool {
        self.bold || self.italic
    }
}

fn concat_runs(runs: &[Run]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// A body paragraph, also used for table cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Plain text (concatenation of the runs when runs are present)
    pub text: String,
    /// Formatted runs, possibly empty
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Create a paragraph of unformatted text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            runs: Vec::new(),
        }
    }

    /// Create a paragraph from runs; the text is their concatenation.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            text: concat_runs(&runs),
            runs,
        }
    }
}

/// A heading paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level in `1..=9`
    pub level: u8,
    pub text: String,
    pub runs: Vec<Run>,
}

impl Heading {
    /// Create a heading; the level is clamped into `1..=9`.
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level: level.clamp(MIN_HEADING_LEVEL, MAX_HEADING_LEVEL),
            text: text.into(),
            runs: Vec::new(),
        }
    }

    /// Create a heading from runs; the level is clamped into `1..=9`.
    pub fn from_runs(level: u8, runs: Vec<Run>) -> Self {
        Self {
            level: level.clamp(MIN_HEADING_LEVEL, MAX_HEADING_LEVEL),
            text: concat_runs(&runs),
            runs,
        }
    }
}

/// Numbering reference of a list item (`w:numPr`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Numbering definition id (`w:numId`)
    pub num_id: String,
    /// Level inside the numbering definition (`w:ilvl`)
    pub level: u32,
}

/// A numbered or bulleted paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Nesting depth, 0 for top-level items
    pub level: u32,
    pub list_info: Option<ListInfo>,
    pub text: String,
    pub runs: Vec<Run>,
}

impl ListItem {
    /// Create a list item without an explicit numbering reference.
    pub fn new(level: u32, text: impl Into<String>) -> Self {
        Self {
            level,
            list_info: None,
            text: text.into(),
            runs: Vec::new(),
        }
    }

    /// Create a list item from runs.
    pub fn from_runs(level: u32, runs: Vec<Run>) -> Self {
        Self {
            level,
            list_info: None,
            text: concat_runs(&runs),
            runs,
        }
    }

    /// Attach a numbering reference.
    pub fn with_list_info(mut self, num_id: impl Into<String>, level: u32) -> Self {
        self.list_info = Some(ListInfo {
            num_id: num_id.into(),
            level,
        });
        self
    }
}

/// One table row; every cell is a paragraph whose text joins the cell's
/// paragraphs with newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<Paragraph>,
}

impl TableRow {
    /// Build a row of plain-text cells.
    pub fn from_texts<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Paragraph::new).collect(),
        }
    }
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a table from rows.
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// Render each row as its cells joined by ` | `.
    pub fn row_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().map(|row| {
            row.cells
                .iter()
                .map(|cell| cell.text.as_str())
                .collect::<Vec<_>>()
                .join(" | ")
        })
    }
}

/// Discriminant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Paragraph,
    Heading,
    Table,
    ListItem,
}

/// A block-level element of the document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Paragraph(Paragraph),
    Heading(Heading),
    Table(Table),
    ListItem(ListItem),
}

impl Node {
    /// Get the kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Heading(_) => NodeKind::Heading,
            Node::Table(_) => NodeKind::Table,
            Node::ListItem(_) => NodeKind::ListItem,
        }
    }

    /// Plain text of the node.
    ///
    /// Tables render one line per row, cells separated by ` | `.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Node::Paragraph(p) => Cow::Borrowed(&p.text),
            Node::Heading(h) => Cow::Borrowed(&h.text),
            Node::ListItem(l) => Cow::Borrowed(&l.text),
            Node::Table(t) => Cow::Owned(t.row_texts().collect::<Vec<_>>().join("\n")),
        }
    }

    /// Runs of a text-bearing node; tables have none.
    pub fn runs(&self) -> &[Run] {
        match self {
            Node::Paragraph(p) => &p.runs,
            Node::Heading(h) => &h.runs,
            Node::ListItem(l) => &l.runs,
            Node::Table(_) => &[],
        }
    }
}

impl From<Paragraph> for Node {
    fn from(p: Paragraph) -> Self {
        Node::Paragraph(p)
    }
}

impl From<Heading> for Node {
    fn from(h: Heading) -> Self {
        Node::Heading(h)
    }
}

impl From<Table> for Node {
    fn from(t: Table) -> Self {
        Node::Table(t)
    }
}

impl From<ListItem> for Node {
    fn from(l: ListItem) -> Self {
        Node::ListItem(l)
    }
}

/// A parsed or programmatically built document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub metadata: Metadata,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, builder style.
    pub fn with_node(mut self, node: impl Into<Node>) -> Self {
        self.nodes.push(node.into());
        self
    }

    /// Append a node.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Number of body nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the body is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Paragraph-granularity text sequence, the input of the diff engine.
    ///
    /// Every text-bearing node contributes its text; a table contributes one
    /// entry per row.
    pub fn paragraph_texts(&self) -> Vec<String> {
        let mut texts = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            match node {
                Node::Table(table) => texts.extend(table.row_texts()),
                other => texts.push(other.text().into_owned()),
            }
        }
        texts
    }

    /// Full plain text, one node per line.
    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .map(|node| node.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

//! Print layout description handed to the rendering collaborator.
//!
//! A document is pages of absolutely positioned backgrounds plus a table
//! grid whose cells are trees of [`Node`]s. Nodes serialize to the
//! `{text | table | columns | canvas | image, ...style}` object shape the
//! renderer consumes; this crate never rasterizes anything.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// Page size, margins and background anchors.
///
/// Defaults to A4 portrait in points with a 20 pt margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    /// Page width (pt).
    pub page_width: f64,
    /// Page height (pt).
    pub page_height: f64,
    /// Outer page margin and inner gap between scorecards (pt).
    pub margin: f64,
    /// Top-left corners of the background image, one per scorecard slot.
    pub background_anchors: Vec<Point>,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 20.0,
            // Positions fit the results table of each quarter.
            background_anchors: vec![
                Point::new(60.0, 170.0),
                Point::new(360.0, 170.0),
                Point::new(60.0, 590.0),
                Point::new(360.0, 590.0),
            ],
        }
    }
}

impl PageGeometry {
    /// Width of one scorecard's content area.
    pub fn card_width(&self) -> f64 {
        (self.page_width - 4.0 * self.margin) / 2.0
    }

    /// Height of one grid row (one scorecard).
    pub fn card_height(&self) -> f64 {
        (self.page_height - 4.0 * self.margin) / 2.0
    }
}

/// An absolute position (pt).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Column width of a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Width {
    /// Share the remaining space (`*`).
    Star,
    /// Fit content (`auto`).
    Auto,
    /// Fixed width (pt).
    Fixed(f64),
}

impl Serialize for Width {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Star => serializer.serialize_str("*"),
            Self::Auto => serializer.serialize_str("auto"),
            Self::Fixed(w) => serializer.serialize_f64(*w),
        }
    }
}

/// Dash pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dash {
    pub length: f64,
}

/// A vector shape drawn on a canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Line(Line),
}

/// A straight line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<Dash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
}

impl Line {
    /// A solid line from `(x1, y1)` to `(x2, y2)`.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            line_width: None,
            dash: None,
            line_color: None,
        }
    }

    pub fn dashed(mut self, length: f64) -> Self {
        self.dash = Some(Dash { length });
        self
    }

    pub fn width(mut self, line_width: f64) -> Self {
        self.line_width = Some(line_width);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.line_color = Some(color.into());
        self
    }
}

/// A table: column widths and rows of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub widths: Vec<Width>,
    pub body: Vec<Vec<Node>>,
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    Text(String),
    Table(Table),
    Columns(Vec<Node>),
    Canvas(Vec<Shape>),
    /// Image data URL.
    Image(String),
}

/// Per-node style attributes. Unset attributes are omitted on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// `[left, top, right, bottom]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<[f64; 4]>,
    /// Cell borders `[left, top, right, bottom]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<[bool; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_position: Option<Point>,
}

/// A layout node: optional content plus style.
///
/// A node without content renders as an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub content: Option<Content>,
    #[serde(flatten)]
    pub style: Style,
}

impl Node {
    fn with_content(content: Content) -> Self {
        Self {
            content: Some(content),
            style: Style::default(),
        }
    }

    /// An empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(Content::Text(text.into()))
    }

    pub fn table(widths: Vec<Width>, body: Vec<Vec<Node>>) -> Self {
        Self::with_content(Content::Table(Table { widths, body }))
    }

    pub fn columns(columns: Vec<Node>) -> Self {
        Self::with_content(Content::Columns(columns))
    }

    pub fn canvas(shapes: Vec<Shape>) -> Self {
        Self::with_content(Content::Canvas(shapes))
    }

    pub fn image(data_url: impl Into<String>) -> Self {
        Self::with_content(Content::Image(data_url.into()))
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.style.font_size = Some(size);
        self
    }

    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.style.alignment = Some(alignment);
        self
    }

    pub fn margin(mut self, margin: [f64; 4]) -> Self {
        self.style.margin = Some(margin);
        self
    }

    pub fn no_border(mut self) -> Self {
        self.style.border = Some([false; 4]);
        self
    }

    pub fn col_span(mut self, span: u32) -> Self {
        self.style.col_span = Some(span);
        self
    }

    pub fn max_height(mut self, height: f64) -> Self {
        self.style.max_height = Some(height);
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.style.absolute_position = Some(position);
        self
    }

    /// Text content, if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            Some(Content::Text(t)) => Some(t),
            _ => None,
        }
    }
}

/// One grid cell: a competitor's scorecard or blank page filler.
#[derive(Debug, Clone, PartialEq)]
pub enum Scorecard {
    Competitor {
        /// Sequence number printed in the corner.
        number: u32,
        round_id: String,
        group_number: u32,
        registrant_id: Option<u32>,
        /// Printed content, top to bottom.
        body: Vec<Node>,
    },
    Blank,
}

impl Scorecard {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Sequence number, `None` for blanks.
    pub fn number(&self) -> Option<u32> {
        match self {
            Self::Competitor { number, .. } => Some(*number),
            Self::Blank => None,
        }
    }
}

impl Serialize for Scorecard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Competitor { body, .. } => {
                let mut seq = serializer.serialize_seq(Some(body.len()))?;
                for node in body {
                    seq.serialize_element(node)?;
                }
                seq.end()
            }
            Self::Blank => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// Padding that alternates between even and odd row/column indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlternatingPadding {
    pub even: f64,
    pub odd: f64,
}

impl AlternatingPadding {
    pub fn at(&self, index: usize) -> f64 {
        if index % 2 == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

/// Cell padding and border widths of the scorecard grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub padding_left: AlternatingPadding,
    pub padding_right: AlternatingPadding,
    pub padding_top: AlternatingPadding,
    pub padding_bottom: AlternatingPadding,
    pub h_line_width: f64,
    pub v_line_width: f64,
}

/// The two-column scorecard grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridTable {
    pub widths: Vec<Width>,
    /// Height of every row (pt).
    pub heights: f64,
    pub dont_break_rows: bool,
    pub body: Vec<Vec<Scorecard>>,
}

/// Grid content of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridContent {
    pub layout: GridLayout,
    pub table: GridTable,
}

/// Complete document description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    /// Drawn on every page behind the content.
    pub background: Vec<Node>,
    /// `[horizontal, vertical]` page margins.
    pub page_margins: [f64; 2],
    pub content: GridContent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_node_shape() {
        let node = Node::text("Round").font_size(9.0).no_border().align(Alignment::Center);
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "text": "Round",
                "fontSize": 9.0,
                "alignment": "center",
                "border": [false, false, false, false]
            })
        );
    }

    #[test]
    fn test_empty_node_is_empty_object() {
        assert_eq!(serde_json::to_value(Node::empty()).unwrap(), json!({}));
        assert_eq!(serde_json::to_value(Scorecard::Blank).unwrap(), json!({}));
    }

    #[test]
    fn test_table_and_canvas_shape() {
        let node = Node::table(
            vec![Width::Fixed(16.0), Width::Star, Width::Auto],
            vec![vec![Node::canvas(vec![Shape::Line(Line::new(0.0, 0.0, 10.0, 0.0).dashed(5.0))])]],
        );
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "table": {
                    "widths": [16.0, "*", "auto"],
                    "body": [[{
                        "canvas": [{
                            "type": "line",
                            "x1": 0.0, "y1": 0.0, "x2": 10.0, "y2": 0.0,
                            "dash": { "length": 5.0 }
                        }]
                    }]]
                }
            })
        );
    }

    #[test]
    fn test_default_geometry_is_a4() {
        let g = PageGeometry::default();
        assert!((g.card_height() - (841.89 - 80.0) / 2.0).abs() < 1e-9);
        assert!((g.card_width() - (595.28 - 80.0) / 2.0).abs() < 1e-9);
        assert_eq!(g.background_anchors.len(), 4);
    }

    #[test]
    fn test_alternating_padding() {
        let p = AlternatingPadding { even: 0.0, odd: 20.0 };
        assert_eq!(p.at(0), 0.0);
        assert_eq!(p.at(3), 20.0);
    }
}

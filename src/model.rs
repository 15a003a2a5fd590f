use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Result, invalid};
use crate::shapes::{StarCounts, rating_to_stars};

/// Shown in value columns whose source field is absent or blank.
pub const PLACEHOLDER: &str = "N/A";
pub const GRID_COLUMNS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// A photo that has already been normalised by the image pipeline.
#[derive(Debug, PartialEq)]
pub struct ImageAsset {
    pub name: String,
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl ImageAsset {
    pub fn new(
        name: impl Into<String>,
        data: Vec<u8>,
        format: ImageFormat,
        pixel_width: u32,
        pixel_height: u32,
    ) -> Result<Self> {
        let name = name.into();
        if pixel_width == 0 || pixel_height == 0 {
            return Err(invalid(format!(
                "image {name:?} has empty dimensions {pixel_width}x{pixel_height}"
            )));
        }
        Ok(Self {
            name,
            data,
            format,
            pixel_width,
            pixel_height,
        })
    }
}

/// Inspection facts as submitted: named string fields plus ordered photos.
#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: BTreeMap<String, String>,
    images: Vec<Arc<ImageAsset>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            images: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_image(mut self, asset: ImageAsset) -> Self {
        self.images.push(Arc::new(asset));
        self
    }

    /// Trimmed field value; blank values count as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn images(&self) -> &[Arc<ImageAsset>] {
        &self.images
    }

    /// Required numeric rating in 0..=5.
    pub fn rating(&self, name: &str) -> Result<f32> {
        let raw = self
            .field(name)
            .ok_or_else(|| invalid(format!("missing rating field {name:?}")))?;
        let score: f32 = raw
            .parse()
            .map_err(|_| invalid(format!("rating field {name:?} is not a number: {raw:?}")))?;
        rating_to_stars(score)?;
        Ok(score)
    }
}

pub(crate) fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// May span several lines separated by `\n`.
    pub brand_text: String,
    pub title_text: String,
    pub meta_lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionTitle {
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Columns {
    One,
    Two,
}

impl Columns {
    pub fn count(self) -> usize {
        match self {
            Columns::One => 1,
            Columns::Two => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValueCard {
    pairs: Vec<(String, String)>,
    columns: Columns,
}

impl KeyValueCard {
    /// Blank values are replaced by [`PLACEHOLDER`].
    pub fn new<L, V>(columns: Columns, pairs: impl IntoIterator<Item = (L, Option<V>)>) -> Self
    where
        L: Into<String>,
        V: AsRef<str>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(label, value)| {
                let value = value.as_ref().map(|v| v.as_ref());
                (label.into(), or_placeholder(value))
            })
            .collect();
        Self { pairs, columns }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    /// Pairs packed `columns` per row; the last row is padded with
    /// empty label/value slots so every row has the same shape.
    pub fn rows(&self) -> Vec<Vec<(&str, &str)>> {
        self.pairs
            .chunks(self.columns.count())
            .map(|chunk| {
                let mut row: Vec<(&str, &str)> = chunk
                    .iter()
                    .map(|(l, v)| (l.as_str(), v.as_str()))
                    .collect();
                row.resize(self.columns.count(), ("", ""));
                row
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Lines of styled spans. Each line wraps independently; an empty line
/// renders as a blank line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichText {
    pub lines: Vec<Vec<Span>>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text, one line per `\n`.
    pub fn plain(text: &str) -> Self {
        Self {
            lines: text.lines().map(|l| vec![Span::plain(l)]).collect(),
        }
    }

    pub fn line(mut self, spans: Vec<Span>) -> Self {
        self.lines.push(spans);
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(Vec::new());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines
            .iter()
            .all(|l| l.iter().all(|s| s.text.trim().is_empty()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NarrativePanel {
    pub text: RichText,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatingRow {
    pub label: String,
    pub score: f32,
    pub stars: StarCounts,
}

impl RatingRow {
    pub fn new(label: impl Into<String>, score: f32) -> Result<Self> {
        let stars = rating_to_stars(score)?;
        Ok(Self {
            label: label.into(),
            score,
            stars,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatingGroup {
    pub rows: Vec<RatingRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageGridCell {
    pub asset: Arc<ImageAsset>,
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GridCell {
    Image(ImageGridCell),
    Empty,
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, GridCell::Empty)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageRow {
    pub cells: [GridCell; GRID_COLUMNS],
}

/// Group cells into rows of three in input order, padding the last row
/// with empty cells.
pub fn image_rows(cells: Vec<ImageGridCell>) -> Vec<ImageRow> {
    let mut rows = Vec::with_capacity(cells.len().div_ceil(GRID_COLUMNS));
    let mut iter = cells.into_iter().peekable();
    while iter.peek().is_some() {
        let row: [GridCell; GRID_COLUMNS] =
            std::array::from_fn(|_| iter.next().map_or(GridCell::Empty, GridCell::Image));
        rows.push(ImageRow { cells: row });
    }
    rows
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeepTogetherGroup {
    pub blocks: Vec<ContentBlock>,
    /// Gap inserted between consecutive children.
    pub spacing: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContentBlock {
    Header(Header),
    SectionTitle(SectionTitle),
    KeyValueCard(KeyValueCard),
    NarrativePanel(NarrativePanel),
    RatingGroup(RatingGroup),
    ImageRow(ImageRow),
    KeepTogether(KeepTogetherGroup),
    Spacer { height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    SectionTitle,
    KeyValueCard,
    NarrativePanel,
    RatingGroup,
    ImageRow,
    KeepTogether,
    Spacer,
}

impl ContentBlock {
    pub fn section_title(text: impl Into<String>) -> Self {
        ContentBlock::SectionTitle(SectionTitle { text: text.into() })
    }

    pub fn spacer(height: f32) -> Self {
        ContentBlock::Spacer { height }
    }

    pub fn keep_together(blocks: Vec<ContentBlock>) -> Self {
        ContentBlock::KeepTogether(KeepTogetherGroup {
            blocks,
            spacing: 0.0,
        })
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Header(_) => BlockKind::Header,
            ContentBlock::SectionTitle(_) => BlockKind::SectionTitle,
            ContentBlock::KeyValueCard(_) => BlockKind::KeyValueCard,
            ContentBlock::NarrativePanel(_) => BlockKind::NarrativePanel,
            ContentBlock::RatingGroup(_) => BlockKind::RatingGroup,
            ContentBlock::ImageRow(_) => BlockKind::ImageRow,
            ContentBlock::KeepTogether(_) => BlockKind::KeepTogether,
            ContentBlock::Spacer { .. } => BlockKind::Spacer,
        }
    }

    /// Heading text that identifies this block in logs: the section title
    /// itself, or the title a keep-together group opens with.
    pub fn caption(&self) -> Option<&str> {
        match self {
            ContentBlock::SectionTitle(t) => Some(&t.text),
            ContentBlock::KeepTogether(g) => g.blocks.first().and_then(ContentBlock::caption),
            _ => None,
        }
    }
}

//! Measurement and placement of content blocks. `measure` is a pure function
//! of the block and the content width; `place` draws into a region whose
//! height is the measured one.

mod card;
mod grid;
mod panel;
mod rating;

use crate::config::{PageGeometry, Style};
use crate::draw::{PageBuffer, Paint, Rect};
use crate::model::ContentBlock;
use crate::shapes::Point;

pub(crate) const CARD_PADDING: f32 = 14.0;
const CARD_BORDER_WIDTH: f32 = 1.0;

#[derive(Clone, Copy, Debug)]
pub struct LayoutContext<'a> {
    pub geometry: &'a PageGeometry,
    pub style: &'a Style,
}

impl<'a> LayoutContext<'a> {
    pub fn new(geometry: &'a PageGeometry, style: &'a Style) -> Self {
        Self { geometry, style }
    }
}

/// Target area for a placed block, in PDF user space. Content grows
/// downwards from `top`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn bottom(&self) -> f32 {
        self.top - self.height
    }

    pub(crate) fn rect(&self) -> Rect {
        Rect::new(self.x, self.bottom(), self.width, self.height)
    }

    pub(crate) fn inset(&self, pad: f32) -> Region {
        Region {
            x: self.x + pad,
            top: self.top - pad,
            width: (self.width - 2.0 * pad).max(0.0),
            height: (self.height - 2.0 * pad).max(0.0),
        }
    }

    /// Map a point given relative to the region's top-left corner with y
    /// growing downwards.
    pub(crate) fn from_top_left(&self, local: Point) -> Point {
        Point::new(self.x + local.x, self.top - local.y)
    }
}

/// White card with a hairline border, shared by cards, panels and ratings.
pub(crate) fn draw_card(buf: &mut PageBuffer, region: Region, style: &Style) {
    buf.rect(
        region.rect(),
        Paint::fill_and_stroke(
            style.palette.card_background,
            style.palette.border,
            CARD_BORDER_WIDTH,
        ),
    );
}

impl ContentBlock {
    /// Height of this block laid out at `width`.
    pub fn measure(&self, ctx: &LayoutContext, width: f32) -> f32 {
        match self {
            ContentBlock::Header(header) => panel::measure_header(header, ctx, width),
            ContentBlock::SectionTitle(title) => panel::measure_section_title(title, ctx, width),
            ContentBlock::KeyValueCard(card) => card::measure(card, ctx, width),
            ContentBlock::NarrativePanel(p) => panel::measure_narrative(p, ctx, width),
            ContentBlock::RatingGroup(group) => rating::measure(group),
            ContentBlock::ImageRow(row) => grid::measure(row, ctx, width),
            ContentBlock::KeepTogether(group) => {
                let children: f32 = group.blocks.iter().map(|b| b.measure(ctx, width)).sum();
                let gaps = group.blocks.len().saturating_sub(1) as f32 * group.spacing;
                children + gaps
            }
            ContentBlock::Spacer { height } => *height,
        }
    }

    /// Draw this block into `region`.
    pub fn place(&self, ctx: &LayoutContext, region: Region, buf: &mut PageBuffer) {
        match self {
            ContentBlock::Header(header) => panel::place_header(header, ctx, region, buf),
            ContentBlock::SectionTitle(title) => panel::place_section_title(title, ctx, region, buf),
            ContentBlock::KeyValueCard(card) => card::place(card, ctx, region, buf),
            ContentBlock::NarrativePanel(p) => panel::place_narrative(p, ctx, region, buf),
            ContentBlock::RatingGroup(group) => rating::place(group, ctx, region, buf),
            ContentBlock::ImageRow(row) => grid::place(row, ctx, region, buf),
            ContentBlock::KeepTogether(group) => {
                let mut top = region.top;
                for child in &group.blocks {
                    let h = child.measure(ctx, region.width);
                    let child_region = Region {
                        x: region.x,
                        top,
                        width: region.width,
                        height: h,
                    };
                    child.place(ctx, child_region, buf);
                    top -= h + group.spacing;
                }
            }
            ContentBlock::Spacer { .. } => {}
        }
    }
}

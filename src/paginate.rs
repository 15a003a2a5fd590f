//! Single forward pass that places measured blocks onto fixed-size pages.
//! Blocks are never split; a block that does not fit the remaining space
//! starts a new page.

use std::time::Instant;

use crate::blocks::{LayoutContext, Region};
use crate::config::PageGeometry;
use crate::draw::PageBuffer;
use crate::error::{Result, invalid};
use crate::model::{BlockKind, ContentBlock};

/// Slack for accumulated rounding when a block exactly fills a page.
const FIT_TOLERANCE: f32 = 1e-3;

#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub kind: BlockKind,
    pub caption: Option<String>,
    /// Distance from the page top to the block's top edge.
    pub top: f32,
    pub height: f32,
}

#[derive(Clone, Debug)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    /// Distance from the page top reached so far.
    pub cursor: f32,
    pub placements: Vec<Placement>,
    pub buffer: PageBuffer,
}

impl Page {
    fn new(number: usize, geometry: &PageGeometry) -> Self {
        Self {
            number,
            cursor: geometry.margin,
            placements: Vec::new(),
            buffer: PageBuffer::new(),
        }
    }

    /// Sum of the heights placed on this page.
    pub fn used_height(&self) -> f32 {
        self.placements.iter().map(|p| p.height).sum()
    }

    /// True once anything other than spacing has been placed.
    pub fn has_content(&self) -> bool {
        self.placements.iter().any(|p| p.kind != BlockKind::Spacer)
    }

    pub fn kinds(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.placements.iter().map(|p| p.kind)
    }
}

/// Paginated body content, before footers are stamped.
#[derive(Clone, Debug)]
pub struct Document {
    pub geometry: PageGeometry,
    pub title: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay `blocks` out in order. Each block is measured once; the measured
/// height is the one it is placed with.
pub fn paginate(blocks: &[ContentBlock], ctx: &LayoutContext) -> Result<Document> {
    let t0 = Instant::now();
    let geometry = ctx.geometry;
    geometry.validate()?;

    let width = geometry.content_width();
    let limit = geometry.content_limit();
    let usable = geometry.usable_height();

    let mut pages: Vec<Page> = Vec::new();
    let mut page = Page::new(1, geometry);

    for (idx, block) in blocks.iter().enumerate() {
        let height = block.measure(ctx, width);
        if !height.is_finite() || height < 0.0 {
            return Err(invalid(format!(
                "block {idx} ({:?}) measured an invalid height {height}",
                block.kind()
            )));
        }

        let fits = page.cursor + height <= limit + FIT_TOLERANCE;
        if !fits && block.kind() == BlockKind::Spacer {
            // Spacing never carries over to lead the next page.
            log::debug!(
                "DROP page={} block={} spacer h={:.2} at the page break",
                page.number,
                idx,
                height
            );
            continue;
        }

        if !fits && !page.placements.is_empty() {
            if page.has_content() {
                let next = page.number + 1;
                pages.push(std::mem::replace(&mut page, Page::new(next, geometry)));
            } else {
                // Only leading spacing so far: start the page over rather
                // than emit a blank one.
                page = Page::new(page.number, geometry);
            }
        }

        if height > usable + FIT_TOLERANCE {
            log::warn!(
                "block {} ({:?}) is {:.1}pt tall but a page holds {:.1}pt; it will overflow page {}",
                idx,
                block.kind(),
                height,
                usable,
                page.number
            );
        }

        let region = Region {
            x: geometry.margin,
            top: geometry.page_height - page.cursor,
            width,
            height,
        };
        block.place(ctx, region, &mut page.buffer);
        log::debug!(
            "PLACE page={} block={} kind={:?} top={:.2} h={:.2}",
            page.number,
            idx,
            block.kind(),
            page.cursor,
            height
        );
        page.placements.push(Placement {
            kind: block.kind(),
            caption: block.caption().map(str::to_string),
            top: page.cursor,
            height,
        });
        page.cursor += height;
    }
    pages.push(page);

    log::info!(
        "Paginated {} blocks onto {} pages in {:.1}ms",
        blocks.len(),
        pages.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(Document {
        geometry: geometry.clone(),
        title: String::new(),
        pages,
    })
}

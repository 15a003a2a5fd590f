use crate::draw::{DrawCommand, PageBuffer, Rect};
use crate::fonts::{FontStyle, line_height};
use crate::model::{GRID_COLUMNS, GridCell, ImageAsset, ImageRow};
use crate::text::{Alignment, LinePlacement, TextLine, first_baseline, render_lines, wrap_text};

use super::{LayoutContext, Region, draw_card};

const CELL_GAP: f32 = 12.0;
const IMAGE_HEIGHT: f32 = 67.5;
const IMAGE_SIDE_PADDING: f32 = 6.0;
const CAPTION_PAD_TOP: f32 = 10.0;
const CAPTION_PAD_BOTTOM: f32 = 6.0;
const IMAGE_PAD_TOP: f32 = 6.0;
const IMAGE_PAD_BOTTOM: f32 = 10.0;

fn cell_width(width: f32) -> f32 {
    ((width - CELL_GAP * (GRID_COLUMNS as f32 - 1.0)) / GRID_COLUMNS as f32).max(1.0)
}

fn caption_lines(cell: &GridCell, ctx: &LayoutContext, cell_w: f32) -> Vec<TextLine> {
    match cell {
        GridCell::Image(c) => wrap_text(
            &c.caption,
            FontStyle::Regular,
            ctx.style.typography.small,
            (cell_w - 2.0 * IMAGE_SIDE_PADDING).max(1.0),
        ),
        GridCell::Empty => Vec::new(),
    }
}

fn cell_height(caption_line_count: usize, ctx: &LayoutContext) -> f32 {
    CAPTION_PAD_TOP
        + caption_line_count as f32 * line_height(ctx.style.typography.small)
        + CAPTION_PAD_BOTTOM
        + IMAGE_PAD_TOP
        + IMAGE_HEIGHT
        + IMAGE_PAD_BOTTOM
}

/// Every cell in a row shares the height of the tallest caption.
pub(super) fn measure(row: &ImageRow, ctx: &LayoutContext, width: f32) -> f32 {
    let cell_w = cell_width(width);
    let lines = row
        .cells
        .iter()
        .map(|c| caption_lines(c, ctx, cell_w).len())
        .max()
        .unwrap_or(0);
    cell_height(lines.max(1), ctx)
}

/// Largest rect with the asset's aspect ratio that fits `frame`, centred.
fn fit_image(asset: &ImageAsset, frame: Rect) -> Rect {
    let aspect = asset.pixel_width as f32 / asset.pixel_height as f32;
    let (mut w, mut h) = (frame.width, frame.width / aspect);
    if h > frame.height {
        h = frame.height;
        w = h * aspect;
    }
    Rect::new(
        frame.x + (frame.width - w) / 2.0,
        frame.y + (frame.height - h) / 2.0,
        w,
        h,
    )
}

pub(super) fn place(row: &ImageRow, ctx: &LayoutContext, region: Region, buf: &mut PageBuffer) {
    let small = ctx.style.typography.small;
    let cell_w = cell_width(region.width);

    for (i, cell) in row.cells.iter().enumerate() {
        let GridCell::Image(image) = cell else {
            continue;
        };
        let cell_region = Region {
            x: region.x + i as f32 * (cell_w + CELL_GAP),
            top: region.top,
            width: cell_w,
            height: region.height,
        };
        draw_card(buf, cell_region, ctx.style);

        let lines = caption_lines(cell, ctx, cell_w);
        let caption_top = cell_region.top - CAPTION_PAD_TOP;
        render_lines(
            buf,
            &lines,
            &LinePlacement {
                x: cell_region.x + IMAGE_SIDE_PADDING,
                width: cell_w - 2.0 * IMAGE_SIDE_PADDING,
                first_baseline_y: first_baseline(caption_top, small),
                leading: line_height(small),
                font_size: small,
                alignment: Alignment::Center,
                color: ctx.style.palette.label,
            },
        );

        let frame = Rect::new(
            cell_region.x + IMAGE_SIDE_PADDING,
            cell_region.bottom() + IMAGE_PAD_BOTTOM,
            (cell_w - 2.0 * IMAGE_SIDE_PADDING).max(1.0),
            IMAGE_HEIGHT,
        );
        log::trace!("IMAGE {:?} frame={:?}", image.asset.name, frame);
        buf.push(DrawCommand::Image {
            asset: image.asset.clone(),
            rect: fit_image(&image.asset, frame),
        });
    }
}

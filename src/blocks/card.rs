use crate::draw::PageBuffer;
use crate::fonts::{FontStyle, line_height};
use crate::model::KeyValueCard;
use crate::text::{Alignment, LinePlacement, TextLine, first_baseline, render_lines, wrap_text};

use super::{CARD_PADDING, LayoutContext, Region, draw_card};

const CELL_PADDING_V: f32 = 8.0;
/// Gap between a value column and the next slot's label.
const SLOT_GAP: f32 = 12.0;

struct SlotGeometry {
    x: f32, // offset from the card's inner left edge
    label_w: f32,
    value_w: f32,
}

fn slot_geometry(card: &KeyValueCard, ctx: &LayoutContext, inner_w: f32) -> Vec<SlotGeometry> {
    let n = card.columns().count();
    let [label_ratio, value_ratio] = ctx.geometry.content_column_ratios.key_value;
    let slot_w = inner_w / n as f32;
    (0..n)
        .map(|i| {
            let gap = if i + 1 < n { SLOT_GAP } else { 0.0 };
            SlotGeometry {
                x: i as f32 * slot_w,
                label_w: slot_w * label_ratio,
                value_w: (slot_w * value_ratio - gap).max(1.0),
            }
        })
        .collect()
}

struct RowLayout {
    height: f32,
    cells: Vec<(Vec<TextLine>, Vec<TextLine>)>, // (label lines, value lines) per slot
}

fn compute_row_layouts(card: &KeyValueCard, ctx: &LayoutContext, width: f32) -> Vec<RowLayout> {
    let size = ctx.style.typography.body;
    let line_h = line_height(size);
    let slots = slot_geometry(card, ctx, (width - 2.0 * CARD_PADDING).max(1.0));
    card.rows()
        .into_iter()
        .map(|row| {
            let cells: Vec<(Vec<TextLine>, Vec<TextLine>)> = row
                .iter()
                .zip(&slots)
                .map(|((label, value), slot)| {
                    (
                        wrap_text(label, FontStyle::Bold, size, slot.label_w),
                        wrap_text(value, FontStyle::Regular, size, slot.value_w),
                    )
                })
                .collect();
            let max_lines = cells
                .iter()
                .map(|(l, v)| l.len().max(v.len()))
                .max()
                .unwrap_or(1);
            RowLayout {
                height: 2.0 * CELL_PADDING_V + max_lines as f32 * line_h,
                cells,
            }
        })
        .collect()
}

pub(super) fn measure(card: &KeyValueCard, ctx: &LayoutContext, width: f32) -> f32 {
    let rows: f32 = compute_row_layouts(card, ctx, width)
        .iter()
        .map(|r| r.height)
        .sum();
    2.0 * CARD_PADDING + rows
}

pub(super) fn place(card: &KeyValueCard, ctx: &LayoutContext, region: Region, buf: &mut PageBuffer) {
    let size = ctx.style.typography.body;
    let palette = &ctx.style.palette;
    let layouts = compute_row_layouts(card, ctx, region.width);
    draw_card(buf, region, ctx.style);

    let inner = region.inset(CARD_PADDING);
    let slots = slot_geometry(card, ctx, inner.width);
    let mut row_top = inner.top;

    for (ri, layout) in layouts.iter().enumerate() {
        log::trace!("CARD row={} row_h={:.2} row_top={:.2}", ri, layout.height, row_top);
        let baseline = first_baseline(row_top - CELL_PADDING_V, size);
        for ((label_lines, value_lines), slot) in layout.cells.iter().zip(&slots) {
            let x = inner.x + slot.x;
            render_lines(
                buf,
                label_lines,
                &LinePlacement {
                    x,
                    width: slot.label_w,
                    first_baseline_y: baseline,
                    leading: line_height(size),
                    font_size: size,
                    alignment: Alignment::Left,
                    color: palette.label,
                },
            );
            render_lines(
                buf,
                value_lines,
                &LinePlacement {
                    x: x + slot.label_w,
                    width: slot.value_w,
                    first_baseline_y: baseline,
                    leading: line_height(size),
                    font_size: size,
                    alignment: Alignment::Left,
                    color: palette.text,
                },
            );
        }
        row_top -= layout.height;
    }
}

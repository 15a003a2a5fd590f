use crate::draw::{PageBuffer, Paint, Rect};
use crate::fonts::{FontStyle, line_height};
use crate::model::{Header, NarrativePanel, SectionTitle};
use crate::text::{Alignment, LinePlacement, TextLine, build_lines, first_baseline, render_lines, wrap_text};

use super::{CARD_PADDING, LayoutContext, Region, draw_card};

const HEADER_PADDING: f32 = 10.0;
const HEADER_BOTTOM_PADDING: f32 = 8.0;
const HEADER_RULE: f32 = 3.0;

const SECTION_SPACE_BEFORE: f32 = 8.0;
const SECTION_SPACE_AFTER: f32 = 6.0;
const SECTION_INDENT: f32 = 8.0;
const ACCENT_BAR_WIDTH: f32 = 3.0;

const NARRATIVE_LEADING: f32 = 14.0;

struct HeaderLayout {
    columns: [(f32, f32); 3], // (x offset, width) within the region
    brand: Vec<TextLine>,
    title: Vec<TextLine>,
    meta: Vec<TextLine>,
    content_h: f32,
}

fn layout_header(header: &Header, ctx: &LayoutContext, width: f32) -> HeaderLayout {
    let ratios = ctx.geometry.content_column_ratios.header;
    let t = &ctx.style.typography;
    let mut x = 0.0;
    let columns = ratios.map(|r| {
        let col = (x, width * r);
        x += width * r;
        col
    });
    let text_w = |i: usize| (columns[i].1 - 2.0 * HEADER_PADDING).max(1.0);

    let brand = wrap_text(&header.brand_text, FontStyle::Bold, t.title, text_w(0));
    let title = wrap_text(&header.title_text, FontStyle::Bold, t.title, text_w(1));
    let meta: Vec<TextLine> = header
        .meta_lines
        .iter()
        .flat_map(|line| wrap_text(line, FontStyle::Regular, t.small, text_w(2)))
        .collect();

    let content_h = [
        brand.len() as f32 * line_height(t.title),
        title.len() as f32 * line_height(t.title),
        meta.len() as f32 * line_height(t.small),
    ]
    .into_iter()
    .fold(0.0f32, f32::max);

    HeaderLayout {
        columns,
        brand,
        title,
        meta,
        content_h,
    }
}

pub(super) fn measure_header(header: &Header, ctx: &LayoutContext, width: f32) -> f32 {
    HEADER_PADDING + layout_header(header, ctx, width).content_h + HEADER_BOTTOM_PADDING + HEADER_RULE
}

pub(super) fn place_header(header: &Header, ctx: &LayoutContext, region: Region, buf: &mut PageBuffer) {
    let layout = layout_header(header, ctx, region.width);
    let palette = &ctx.style.palette;
    let t = &ctx.style.typography;

    draw_card(buf, region, ctx.style);
    buf.rect(
        Rect::new(region.x, region.bottom(), region.width, HEADER_RULE),
        Paint::fill(palette.accent),
    );

    let text_top = region.top - HEADER_PADDING;
    let column = |i: usize| {
        let (x, w) = layout.columns[i];
        (region.x + x + HEADER_PADDING, (w - 2.0 * HEADER_PADDING).max(1.0))
    };

    let (x, width) = column(0);
    render_lines(
        buf,
        &layout.brand,
        &LinePlacement {
            x,
            width,
            first_baseline_y: first_baseline(text_top, t.title),
            leading: line_height(t.title),
            font_size: t.title,
            alignment: Alignment::Left,
            color: palette.primary,
        },
    );

    // Title is vertically centred in the content band.
    let (x, width) = column(1);
    let title_h = layout.title.len() as f32 * line_height(t.title);
    let title_top = text_top - (layout.content_h - title_h) / 2.0;
    render_lines(
        buf,
        &layout.title,
        &LinePlacement {
            x,
            width,
            first_baseline_y: first_baseline(title_top, t.title),
            leading: line_height(t.title),
            font_size: t.title,
            alignment: Alignment::Center,
            color: palette.primary,
        },
    );

    let (x, width) = column(2);
    render_lines(
        buf,
        &layout.meta,
        &LinePlacement {
            x,
            width,
            first_baseline_y: first_baseline(text_top, t.small),
            leading: line_height(t.small),
            font_size: t.small,
            alignment: Alignment::Right,
            color: palette.meta,
        },
    );
}

fn section_lines(title: &SectionTitle, ctx: &LayoutContext, width: f32) -> Vec<TextLine> {
    let text_w = (width - SECTION_INDENT - ACCENT_BAR_WIDTH).max(1.0);
    wrap_text(&title.text, FontStyle::Bold, ctx.style.typography.section, text_w)
}

pub(super) fn measure_section_title(title: &SectionTitle, ctx: &LayoutContext, width: f32) -> f32 {
    let lines = section_lines(title, ctx, width);
    SECTION_SPACE_BEFORE
        + lines.len() as f32 * line_height(ctx.style.typography.section)
        + SECTION_SPACE_AFTER
}

pub(super) fn place_section_title(
    title: &SectionTitle,
    ctx: &LayoutContext,
    region: Region,
    buf: &mut PageBuffer,
) {
    let size = ctx.style.typography.section;
    let lines = section_lines(title, ctx, region.width);
    let text_h = lines.len() as f32 * line_height(size);
    let text_top = region.top - SECTION_SPACE_BEFORE;

    buf.rect(
        Rect::new(region.x, text_top - text_h, ACCENT_BAR_WIDTH, text_h),
        Paint::fill(ctx.style.palette.accent),
    );
    render_lines(
        buf,
        &lines,
        &LinePlacement {
            x: region.x + ACCENT_BAR_WIDTH + SECTION_INDENT,
            width: region.width - ACCENT_BAR_WIDTH - SECTION_INDENT,
            first_baseline_y: first_baseline(text_top, size),
            leading: line_height(size),
            font_size: size,
            alignment: Alignment::Left,
            color: ctx.style.palette.primary,
        },
    );
}

fn narrative_lines(panel: &NarrativePanel, ctx: &LayoutContext, width: f32) -> Vec<TextLine> {
    let text_w = (width - 2.0 * CARD_PADDING).max(1.0);
    let size = ctx.style.typography.body;
    panel
        .text
        .lines
        .iter()
        .flat_map(|spans| build_lines(spans, size, text_w))
        .collect()
}

pub(super) fn measure_narrative(panel: &NarrativePanel, ctx: &LayoutContext, width: f32) -> f32 {
    2.0 * CARD_PADDING + narrative_lines(panel, ctx, width).len() as f32 * NARRATIVE_LEADING
}

pub(super) fn place_narrative(
    panel: &NarrativePanel,
    ctx: &LayoutContext,
    region: Region,
    buf: &mut PageBuffer,
) {
    let size = ctx.style.typography.body;
    let lines = narrative_lines(panel, ctx, region.width);
    draw_card(buf, region, ctx.style);
    let inner = region.inset(CARD_PADDING);
    render_lines(
        buf,
        &lines,
        &LinePlacement {
            x: inner.x,
            width: inner.width,
            first_baseline_y: first_baseline(inner.top, size),
            leading: NARRATIVE_LEADING,
            font_size: size,
            alignment: Alignment::Left,
            color: ctx.style.palette.text,
        },
    );
}

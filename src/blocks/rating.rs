use crate::config::Palette;
use crate::draw::{PageBuffer, Paint, TextRun};
use crate::fonts::{ASCENDER_RATIO, FontStyle};
use crate::model::{RatingGroup, RatingRow};
use crate::shapes::{Point, half_star, star};

use super::{CARD_PADDING, LayoutContext, Region, draw_card};

const ROW_PADDING_V: f32 = 8.0;
const STAR_BAND: f32 = 16.0;
const STAR_RADIUS: f32 = 6.0;
const STAR_PITCH: f32 = 14.0;
const STAR_STROKE: f32 = 0.8;
const SCORE_OFFSET_X: f32 = 75.0;
const SCORE_FONT_SIZE: f32 = 8.0;

const ROW_HEIGHT: f32 = 2.0 * ROW_PADDING_V + STAR_BAND;

pub(super) fn measure(group: &RatingGroup) -> f32 {
    2.0 * CARD_PADDING + group.rows.len() as f32 * ROW_HEIGHT
}

#[derive(Clone, Copy)]
enum StarFill {
    Full,
    Half,
    Empty,
}

fn star_fills(row: &RatingRow) -> impl Iterator<Item = StarFill> {
    let s = row.stars;
    std::iter::repeat_n(StarFill::Full, s.full as usize)
        .chain(s.half.then_some(StarFill::Half))
        .chain(std::iter::repeat_n(StarFill::Empty, s.empty as usize))
}

fn draw_star(buf: &mut PageBuffer, band: &Region, cx: f32, fill: StarFill, palette: &Palette) {
    let cy = STAR_BAND / 2.0;
    // Shapes are generated y-down so the first vertex points up on the page.
    let outline: Vec<Point> = star(cx, cy, STAR_RADIUS)
        .into_iter()
        .map(|p| band.from_top_left(p))
        .collect();
    match fill {
        StarFill::Full => buf.polygon(
            &outline,
            Paint::fill_and_stroke(palette.star_fill, palette.star_stroke, STAR_STROKE),
        ),
        StarFill::Empty => buf.polygon(
            &outline,
            Paint::fill_and_stroke(palette.star_empty_fill, palette.star_empty_stroke, STAR_STROKE),
        ),
        StarFill::Half => {
            let left: Vec<Point> = half_star(cx, cy, STAR_RADIUS)
                .into_iter()
                .map(|p| band.from_top_left(p))
                .collect();
            buf.polygon(&outline, Paint::fill(palette.star_empty_fill));
            buf.polygon(&left, Paint::fill(palette.star_fill));
            buf.polygon(&outline, Paint::stroke(palette.star_stroke, STAR_STROKE));
        }
    }
}

pub(super) fn place(group: &RatingGroup, ctx: &LayoutContext, region: Region, buf: &mut PageBuffer) {
    let palette = &ctx.style.palette;
    let body = ctx.style.typography.body;
    let [label_ratio, _] = ctx.geometry.content_column_ratios.rating;

    draw_card(buf, region, ctx.style);
    let inner = region.inset(CARD_PADDING);
    let label_w = inner.width * label_ratio;

    for (i, row) in group.rows.iter().enumerate() {
        let row_top = inner.top - i as f32 * ROW_HEIGHT;
        let band = Region {
            x: inner.x + label_w,
            top: row_top - ROW_PADDING_V,
            width: inner.width - label_w,
            height: STAR_BAND,
        };
        let mid = band.top - STAR_BAND / 2.0;

        buf.text(TextRun {
            x: inner.x,
            y: mid - body * ASCENDER_RATIO / 2.0,
            text: row.label.clone(),
            font: FontStyle::Bold,
            size: body,
            color: palette.label,
        });

        for (si, fill) in star_fills(row).enumerate() {
            let cx = si as f32 * STAR_PITCH + STAR_RADIUS;
            draw_star(buf, &band, cx, fill, palette);
        }

        buf.text(TextRun {
            x: band.x + SCORE_OFFSET_X,
            y: band.bottom() + 4.0,
            text: score_caption(row.score),
            font: FontStyle::Regular,
            size: SCORE_FONT_SIZE,
            color: palette.rating_caption,
        });
    }
}

/// `(4.0/5)`, `(4.25/5)`: the score as given, never rounded, always with a
/// decimal point.
fn score_caption(score: f32) -> String {
    format!("({score:?}/5)")
}

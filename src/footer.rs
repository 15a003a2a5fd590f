//! Second pass over a paginated document. Footers need the final page
//! count, so they are stamped only once every page has been laid out.

use std::time::Instant;

use crate::config::{ContactItem, ContactKind, IconStyle, PageGeometry, Style, mm};
use crate::draw::{DrawCommand, DrawingBackend, PageBuffer, Paint, Rect, Stroke, TextRun};
use crate::error::Result;
use crate::fonts::FontStyle;
use crate::paginate::Document;
use crate::pdf::PdfBackend;
use crate::shapes::{IconLayer, Mark, Point, Primitive, envelope_icon, globe_icon, phone_icon};

const BOX_HEIGHT_MM: f32 = 12.0;
const BOX_BORDER_WIDTH: f32 = 0.5;
const ICON_SIZE_MM: f32 = 4.0;
const ICON_STROKE_WIDTH: f32 = 0.6;

pub fn footer_label(page: usize, total: usize) -> String {
    format!("Page {page} of {total}")
}

/// Final pages: background, body and footer, ready to replay.
#[derive(Clone, Debug)]
pub struct ComposedDocument {
    pub geometry: PageGeometry,
    pub title: String,
    pub pages: Vec<PageBuffer>,
}

impl ComposedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Feed every page, in order, to `backend`.
    pub fn replay_into<B: DrawingBackend>(&self, mut backend: B) -> Result<B::Output> {
        let (w, h) = (self.geometry.page_width, self.geometry.page_height);
        for page in &self.pages {
            backend.begin_page(w, h)?;
            for command in page.commands() {
                backend.draw(command)?;
            }
            backend.end_page()?;
        }
        backend.finish()
    }
}

fn centred_text(buf: &mut PageBuffer, center_x: f32, y: f32, text: &str, size: f32, style: &Style) {
    let width = FontStyle::Regular.text_width(text, size);
    buf.text(TextRun {
        x: center_x - width / 2.0,
        y,
        text: text.to_string(),
        font: FontStyle::Regular,
        size,
        color: style.palette.meta,
    });
}

fn icon_marks(kind: ContactKind, center: Point, size: f32) -> Vec<Mark> {
    match kind {
        ContactKind::Email => envelope_icon(center, size),
        ContactKind::Phone => phone_icon(center, size),
        ContactKind::Web => globe_icon(center, size),
    }
}

fn draw_mark(buf: &mut PageBuffer, mark: &Mark, contact: &ContactItem, style: &Style) {
    let color = match (style.icon_style, mark.layer) {
        (IconStyle::Outline, _) | (IconStyle::Filled, IconLayer::Base) => contact.color,
        (IconStyle::Filled, IconLayer::Detail) => style.palette.icon_detail,
    };
    let paint = if mark.filled && style.icon_style == IconStyle::Filled {
        Paint::fill(color)
    } else {
        Paint::stroke(color, ICON_STROKE_WIDTH)
    };
    match mark.shape {
        Primitive::Rect {
            x,
            y,
            width,
            height,
        } => buf.rect(Rect::new(x, y, width, height), paint),
        Primitive::Circle { center, radius } => buf.push(DrawCommand::Circle {
            center,
            radius,
            paint,
        }),
        Primitive::Line { from, to } => buf.line(
            from,
            to,
            Stroke {
                color,
                width: ICON_STROKE_WIDTH,
            },
        ),
    }
}

/// Footer band content for page `page` of `total`.
fn draw_footer(buf: &mut PageBuffer, geometry: &PageGeometry, style: &Style, page: usize, total: usize) {
    let (w, margin) = (geometry.page_width, geometry.margin);
    let small = style.typography.small;

    // The box is centred in the band directly above the bottom margin.
    let box_h = mm(BOX_HEIGHT_MM);
    let box_bottom = margin + (geometry.footer_band_height - box_h) / 2.0;
    buf.rect(
        Rect::new(margin, box_bottom, w - 2.0 * margin, box_h),
        Paint::fill_and_stroke(
            style.palette.card_background,
            style.palette.border,
            BOX_BORDER_WIDTH,
        ),
    );

    let footer_y = box_bottom + mm(3.0);
    let icon_y = footer_y + mm(5.5);
    let icon_xs = [margin + mm(3.0), w / 2.0 - mm(30.0), w - margin - mm(55.0)];
    for (contact, icon_x) in style.branding.contacts.iter().zip(icon_xs) {
        for mark in icon_marks(contact.kind, Point::new(icon_x, icon_y), mm(ICON_SIZE_MM)) {
            draw_mark(buf, &mark, contact, style);
        }
        buf.text(TextRun {
            x: icon_x + mm(3.0),
            y: footer_y + mm(5.0),
            text: contact.text.clone(),
            font: FontStyle::Regular,
            size: small,
            color: style.palette.footer_text,
        });
    }

    centred_text(buf, w / 2.0, footer_y + mm(1.0), &footer_label(page, total), small - 1.0, style);
    centred_text(
        buf,
        w / 2.0,
        footer_y - mm(1.5),
        &style.branding.disclaimer,
        small - 2.0,
        style,
    );
}

/// Stamp background and footer onto every page. Page order and body
/// content are preserved; only the footer band is added.
pub fn compose_footers(doc: Document, style: &Style) -> ComposedDocument {
    let t0 = Instant::now();
    let geometry = doc.geometry;
    let total = doc.pages.len();

    let pages = doc
        .pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            let mut buf = PageBuffer::new();
            buf.rect(
                Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height),
                Paint::fill(style.palette.page_background),
            );
            buf.extend(&page.buffer);
            draw_footer(&mut buf, &geometry, style, i + 1, total);
            buf
        })
        .collect();

    log::info!(
        "Stamped footers on {} pages in {:.1}ms",
        total,
        t0.elapsed().as_secs_f64() * 1000.0
    );

    ComposedDocument {
        geometry,
        title: doc.title,
        pages,
    }
}

/// Compose footers and render the result to PDF bytes.
pub fn finalize(doc: Document, style: &Style) -> Result<Vec<u8>> {
    let composed = compose_footers(doc, style);
    let backend = PdfBackend::new(&composed.title);
    composed.replay_into(backend)
}

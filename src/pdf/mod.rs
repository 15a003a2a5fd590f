//! `DrawingBackend` that writes a PDF with `pdf-writer`.

mod xobject;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::draw::{DrawCommand, DrawingBackend, Paint, TextRun};
use crate::error::{Error, Result};
use crate::fonts::{FontEntry, register_builtin_fonts, to_winansi_bytes};
use crate::model::ImageAsset;
use crate::shapes::Point;

use xobject::embed_image;

/// Control point distance for a quarter circle drawn as one cubic Bézier.
const KAPPA: f32 = 0.552_284_8;

struct RefAlloc(i32);

impl RefAlloc {
    fn bump(&mut self) -> Ref {
        let r = Ref::new(self.0);
        self.0 += 1;
        r
    }
}

struct OpenPage {
    content: Content,
    width: f32,
    height: f32,
    /// XObject names used on this page.
    images: Vec<(String, Ref)>,
}

pub struct PdfBackend {
    pdf: Pdf,
    refs: RefAlloc,
    catalog_id: Ref,
    pages_id: Ref,
    title: String,
    fonts: Vec<FontEntry>,
    /// Keyed by asset address so a shared asset is embedded once.
    images: HashMap<usize, (String, Ref)>,
    page_ids: Vec<Ref>,
    current: Option<OpenPage>,
    started: Instant,
}

impl PdfBackend {
    pub fn new(title: &str) -> Self {
        let mut pdf = Pdf::new();
        let mut refs = RefAlloc(1);
        let catalog_id = refs.bump();
        let pages_id = refs.bump();
        let fonts = register_builtin_fonts(&mut pdf, &mut || refs.bump());
        Self {
            pdf,
            refs,
            catalog_id,
            pages_id,
            title: title.to_string(),
            fonts,
            images: HashMap::new(),
            page_ids: Vec::new(),
            current: None,
            started: Instant::now(),
        }
    }

    fn image_name(&mut self, asset: &Arc<ImageAsset>) -> Result<(String, Ref)> {
        let key = Arc::as_ptr(asset) as usize;
        if let Some(entry) = self.images.get(&key) {
            return Ok(entry.clone());
        }
        let xobj_ref = self.refs.bump();
        let refs = &mut self.refs;
        embed_image(&mut self.pdf, xobj_ref, asset, &mut || refs.bump())?;
        let entry = (format!("Im{}", self.images.len() + 1), xobj_ref);
        self.images.insert(key, entry.clone());
        Ok(entry)
    }

    fn page(&mut self) -> Result<&mut OpenPage> {
        self.current
            .as_mut()
            .ok_or_else(|| Error::Pdf("draw command outside of a page".into()))
    }
}

/// Set colours for `paint`; returns false when there is nothing to paint.
fn set_paint(content: &mut Content, paint: &Paint) -> bool {
    if let Some(fill) = paint.fill {
        let (r, g, b) = fill.unit_rgb();
        content.set_fill_rgb(r, g, b);
    }
    if let Some(stroke) = paint.stroke {
        let (r, g, b) = stroke.color.unit_rgb();
        content.set_stroke_rgb(r, g, b);
        content.set_line_width(stroke.width);
    }
    paint.fill.is_some() || paint.stroke.is_some()
}

fn paint_path(content: &mut Content, paint: &Paint) {
    match (paint.fill.is_some(), paint.stroke.is_some()) {
        (true, true) => content.fill_nonzero_and_stroke(),
        (true, false) => content.fill_nonzero(),
        (false, true) => content.stroke(),
        (false, false) => content.end_path(),
    };
}

fn circle_path(content: &mut Content, c: Point, r: f32) {
    let k = r * KAPPA;
    content.move_to(c.x + r, c.y);
    content.cubic_to(c.x + r, c.y + k, c.x + k, c.y + r, c.x, c.y + r);
    content.cubic_to(c.x - k, c.y + r, c.x - r, c.y + k, c.x - r, c.y);
    content.cubic_to(c.x - r, c.y - k, c.x - k, c.y - r, c.x, c.y - r);
    content.cubic_to(c.x + k, c.y - r, c.x + r, c.y - k, c.x + r, c.y);
    content.close_path();
}

fn show_text(content: &mut Content, run: &TextRun) {
    let (r, g, b) = run.color.unit_rgb();
    content.save_state();
    content.set_fill_rgb(r, g, b);
    content.begin_text();
    content.set_font(Name(run.font.pdf_name().as_bytes()), run.size);
    content.next_line(run.x, run.y);
    content.show(Str(&to_winansi_bytes(&run.text)));
    content.end_text();
    content.restore_state();
}

impl DrawingBackend for PdfBackend {
    type Output = Vec<u8>;

    fn begin_page(&mut self, width: f32, height: f32) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::Pdf("begin_page while a page is open".into()));
        }
        self.current = Some(OpenPage {
            content: Content::new(),
            width,
            height,
            images: Vec::new(),
        });
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        if let DrawCommand::Image { asset, rect } = command {
            let (name, xobj_ref) = self.image_name(asset)?;
            let page = self.page()?;
            page.content.save_state();
            page.content
                .transform([rect.width, 0.0, 0.0, rect.height, rect.x, rect.y]);
            page.content.x_object(Name(name.as_bytes()));
            page.content.restore_state();
            if !page.images.iter().any(|(n, _)| *n == name) {
                page.images.push((name, xobj_ref));
            }
            return Ok(());
        }

        let content = &mut self.page()?.content;
        match command {
            DrawCommand::Rect { rect, paint } => {
                content.save_state();
                if set_paint(content, paint) {
                    content.rect(rect.x, rect.y, rect.width, rect.height);
                    paint_path(content, paint);
                }
                content.restore_state();
            }
            DrawCommand::Polygon { points, paint } => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                content.save_state();
                if set_paint(content, paint) {
                    content.move_to(first.x, first.y);
                    for p in rest {
                        content.line_to(p.x, p.y);
                    }
                    content.close_path();
                    paint_path(content, paint);
                }
                content.restore_state();
            }
            DrawCommand::Circle {
                center,
                radius,
                paint,
            } => {
                content.save_state();
                if set_paint(content, paint) {
                    circle_path(content, *center, *radius);
                    paint_path(content, paint);
                }
                content.restore_state();
            }
            DrawCommand::Line { from, to, stroke } => {
                let (r, g, b) = stroke.color.unit_rgb();
                content.save_state();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(stroke.width);
                content.move_to(from.x, from.y);
                content.line_to(to.x, to.y);
                content.stroke();
                content.restore_state();
            }
            DrawCommand::Text(run) => show_text(content, run),
            DrawCommand::Image { .. } => {}
        }
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let page = self
            .current
            .take()
            .ok_or_else(|| Error::Pdf("end_page without an open page".into()))?;

        let page_id = self.refs.bump();
        let content_id = self.refs.bump();
        let raw = page.content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        self.pdf
            .stream(content_id, &compressed)
            .filter(Filter::FlateDecode);

        let mut pdf_page = self.pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, page.width, page.height))
            .parent(self.pages_id)
            .contents(content_id);
        {
            let mut resources = pdf_page.resources();
            {
                let mut fonts = resources.fonts();
                for entry in &self.fonts {
                    fonts.pair(Name(entry.style.pdf_name().as_bytes()), entry.font_ref);
                }
            }
            if !page.images.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &page.images {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }
        drop(pdf_page);

        log::trace!("PAGE {} written as {:?}", self.page_ids.len() + 1, page_id);
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        if self.current.is_some() {
            self.end_page()?;
        }

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .kids(self.page_ids.iter().copied())
            .count(self.page_ids.len() as i32);

        let info_id = self.refs.bump();
        self.pdf.document_info(info_id).title(TextStr(&self.title));

        let bytes = self.pdf.finish();
        log::info!(
            "Rendered {} pages, {} images, {} bytes in {:.1}ms",
            self.page_ids.len(),
            self.images.len(),
            bytes.len(),
            self.started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(bytes)
    }
}

mod blocks;
mod config;
mod draw;
mod error;
pub mod flow;
mod fonts;
mod footer;
mod model;
mod paginate;
mod pdf;
mod report;
mod shapes;
mod text;

pub use blocks::{LayoutContext, Region};
pub use config::{
    A4_HEIGHT, A4_WIDTH, Branding, ContactItem, ContactKind, ContentColumnRatios, IconStyle,
    POINTS_PER_MM, PageGeometry, Palette, ReportConfig, Style, Typography, mm,
};
pub use draw::{Color, DrawCommand, DrawingBackend, PageBuffer, Paint, Rect, Stroke, TextRun};
pub use error::{Error, Result};
pub use flow::{Flow, ReportStamp};
pub use fonts::FontStyle;
pub use footer::{ComposedDocument, compose_footers, finalize, footer_label};
pub use model::{
    BlockKind, Columns, ContentBlock, GRID_COLUMNS, GridCell, Header, ImageAsset, ImageFormat,
    ImageGridCell, ImageRow, KeepTogetherGroup, KeyValueCard, NarrativePanel, PLACEHOLDER,
    RatingGroup, RatingRow, Record, RichText, SectionTitle, Span, image_rows,
};
pub use paginate::{Document, Page, Placement, paginate};
pub use pdf::PdfBackend;
pub use report::{Report, ReportMetadata};
pub use shapes::{
    INNER_RADIUS_RATIO, IconLayer, MAX_RATING, Mark, Point, Primitive, STAR_POINTS, StarCounts,
    envelope_icon, globe_icon, half_star, phone_icon, rating_to_stars, star,
};

use std::time::Instant;

/// Build, paginate and render a report for `record`, stamped with the
/// current time.
pub fn generate_report(record: &Record, config: &ReportConfig) -> Result<Report> {
    generate_report_with_stamp(record, config, &ReportStamp::now())
}

pub fn generate_report_with_stamp(
    record: &Record,
    config: &ReportConfig,
    stamp: &ReportStamp,
) -> Result<Report> {
    let t0 = Instant::now();
    config.validate()?;

    let flow = flow::build(record, &config.style, stamp)?;
    let t_flow = t0.elapsed();

    let ctx = LayoutContext::new(&config.geometry, &config.style);
    let mut doc = paginate::paginate(&flow.blocks, &ctx)?;
    doc.title = flow.title;
    let page_count = doc.page_count();
    let t_layout = t0.elapsed();

    let bytes = footer::finalize(doc, &config.style)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: flow={:.1}ms, layout={:.1}ms, render={:.1}ms, total={:.1}ms (report {}, {} pages, {} bytes)",
        t_flow.as_secs_f64() * 1000.0,
        (t_layout - t_flow).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        stamp.report_id,
        page_count,
        bytes.len(),
    );

    Ok(Report {
        pdf: bytes,
        metadata: ReportMetadata::new(record, stamp, page_count),
    })
}

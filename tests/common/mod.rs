#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use inspection_report::{
    ContentBlock, DrawCommand, DrawingBackend, ImageAsset, ImageFormat, ImageRow,
    LayoutContext, PageGeometry, Record, ReportStamp, Result, Style,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 2024-03-15 10:30:00 UTC.
pub fn fixed_stamp() -> ReportStamp {
    ReportStamp::new(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap())
}

/// JPEG bytes are passed through to the PDF untouched, so a marker-only
/// payload is enough for layout and output tests.
pub fn fake_jpeg(name: &str) -> ImageAsset {
    let data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0xFF, 0xD9];
    ImageAsset::new(name, data, ImageFormat::Jpeg, 800, 600).unwrap()
}

pub fn with_ratings(record: Record) -> Record {
    record
        .with_field("interiorRating", "4.0")
        .with_field("exteriorRating", "4.5")
        .with_field("engineRating", "4.0")
        .with_field("structureRating", "5.0")
        .with_field("testDriveRating", "4.5")
        .with_field("electricalRating", "4.0")
}

/// Identity fields and ratings only: no notes, no photos.
pub fn minimal_record() -> Record {
    with_ratings(Record::from_fields([
        ("registrationNumber", "MH12AB1234"),
        ("make", "Maruti"),
        ("model", "Swift"),
        ("ownerName", "Asha Patil"),
        ("inspectorName", "R. Kulkarni"),
    ]))
}

pub fn sample_record(image_count: usize) -> Record {
    let mut record = with_ratings(Record::from_fields([
        ("registrationNumber", "MH12AB1234"),
        ("make", "Maruti"),
        ("model", "Swift"),
        ("variant", "VXI"),
        ("chassisNumber", "MA3FJEB1S00123456"),
        ("engineNumber", "K12MN1234567"),
        ("manufactureYear", "2019"),
        ("registrationDate", "12 Jun 2019"),
        ("fuelType", "Petrol"),
        ("color", "Pearl White"),
        ("odometerReading", "48210"),
        ("ownersCount", "1"),
        ("ownerName", "Asha Patil"),
        ("ownerContact", "9876543210"),
        ("ownerEmail", "asha@example.com"),
        ("location", "Pune"),
        ("inspectorName", "R. Kulkarni"),
        ("highlights", "Single owner, full service history, no accident damage."),
        ("paintNotes", "Minor swirl marks on the bonnet."),
        ("engineNotes", "Idles smoothly, no leaks."),
        ("tiresNotes", "Front tyres at 60%."),
        ("issuesFound", "Rear wiper blade worn."),
        ("recommendations", "Replace wiper blade."),
    ]));
    for i in 0..image_count {
        record = record.with_image(fake_jpeg(&format!("photo_{i}")));
    }
    record
}

/// Section titles in flow order, including titles opening keep-together groups.
pub fn section_titles(blocks: &[ContentBlock]) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::SectionTitle(t) => out.push(t.text.clone()),
            ContentBlock::KeepTogether(g) => out.extend(section_titles(&g.blocks)),
            _ => {}
        }
    }
    out
}

pub fn image_rows_in(blocks: &[ContentBlock]) -> Vec<&ImageRow> {
    let mut out = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::ImageRow(row) => out.push(row),
            ContentBlock::KeepTogether(g) => out.extend(image_rows_in(&g.blocks)),
            _ => {}
        }
    }
    out
}

/// A non-spacer block of exactly `height` points.
pub fn filler(height: f32) -> ContentBlock {
    ContentBlock::keep_together(vec![ContentBlock::spacer(height)])
}

pub fn measure(block: &ContentBlock, geometry: &PageGeometry, style: &Style) -> f32 {
    let ctx = LayoutContext::new(geometry, style);
    block.measure(&ctx, geometry.content_width())
}

/// Backend that records what it is asked to draw.
#[derive(Default)]
pub struct RecordingBackend {
    pub pages: Vec<Vec<DrawCommand>>,
    pub sizes: Vec<(f32, f32)>,
    open: bool,
}

impl DrawingBackend for RecordingBackend {
    type Output = RecordingBackend;

    fn begin_page(&mut self, width: f32, height: f32) -> Result<()> {
        assert!(!self.open, "begin_page while a page is open");
        self.open = true;
        self.sizes.push((width, height));
        self.pages.push(Vec::new());
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        assert!(self.open, "draw outside a page");
        self.pages.last_mut().unwrap().push(command.clone());
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }

    fn finish(self) -> Result<Self::Output> {
        Ok(self)
    }
}

pub fn page_texts(commands: &[DrawCommand]) -> Vec<String> {
    commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text(run) => Some(run.text.clone()),
            _ => None,
        })
        .collect()
}

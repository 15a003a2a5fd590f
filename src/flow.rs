//! Turns an inspection record into the ordered list of content blocks that
//! make up a report. Section order is fixed; optional sections are dropped
//! when their source fields are empty.

use chrono::{DateTime, Utc};

use crate::config::Style;
use crate::error::Result;
use crate::model::{
    Columns, ContentBlock, Header, ImageGridCell, KeyValueCard, NarrativePanel, RatingGroup,
    RatingRow, Record, RichText, Span, image_rows,
};

pub const PHOTO_CAPTIONS: [&str; 9] = [
    "RC Book",
    "Chassis Plate",
    "Odometer",
    "Front Bumper",
    "Bonnet",
    "Grille",
    "Dashboard",
    "Seats",
    "Engine Bay",
];

/// (record field, row label) for the rating card, in display order.
pub const RATING_FIELDS: [(&str, &str); 6] = [
    ("interiorRating", "Interior"),
    ("exteriorRating", "Exterior / Body"),
    ("engineRating", "Engine"),
    ("structureRating", "Structure"),
    ("testDriveRating", "Test Drive"),
    ("electricalRating", "Electrical"),
];

const NOTE_FIELDS: [(&str, &str); 6] = [
    ("paintNotes", "Exterior/Paint"),
    ("interiorNotes", "Interior"),
    ("engineNotes", "Engine"),
    ("tiresNotes", "Tires & Wheels"),
    ("structureNotes", "Structure"),
    ("testDriveNotes", "Test Drive"),
];

const NO_HIGHLIGHTS: &str = "No highlights provided.";

const SPACE_AFTER_HEADER: f32 = 10.0;
const SPACE_AFTER_SECTION: f32 = 12.0;
const SPACE_AFTER_RATINGS: f32 = 16.0;
const SPACE_BETWEEN_NOTES: f32 = 6.0;

pub const DATE_FORMAT: &str = "%d %b %Y";

/// Generation time and the report id derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportStamp {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportStamp {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            report_id: format!("INS-{}", generated_at.timestamp()),
            generated_at,
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn date_label(&self) -> String {
        self.generated_at.format(DATE_FORMAT).to_string()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Flow {
    pub blocks: Vec<ContentBlock>,
    /// Document title, recorded in the PDF info dictionary.
    pub title: String,
    pub stamp: ReportStamp,
}

/// Capitalise a letter that follows a non-letter, lowercase the rest.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_letter = false;
    for ch in name.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if prev_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(ch);
            prev_letter = false;
        }
    }
    out
}

fn header(style: &Style, stamp: &ReportStamp) -> ContentBlock {
    ContentBlock::Header(Header {
        brand_text: style.branding.brand_text.clone(),
        title_text: style.branding.report_title.clone(),
        meta_lines: vec![
            "Inspection ID:".into(),
            stamp.report_id.clone(),
            String::new(),
            "Date:".into(),
            stamp.date_label(),
        ],
    })
}

fn vehicle_card(record: &Record) -> KeyValueCard {
    let make_model = [record.field("make"), record.field("model")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let odometer = record.field("odometerReading").map(|v| format!("{v} km"));
    KeyValueCard::new(
        Columns::Two,
        [
            ("Vehicle Number", record.field("registrationNumber").map(str::to_string)),
            ("Make / Model", Some(make_model)),
            ("Variant", record.field("variant").map(str::to_string)),
            (
                "Chassis Number",
                record
                    .field("chassisNumber")
                    .or_else(|| record.field("vinNumber"))
                    .map(str::to_string),
            ),
            ("Engine Number", record.field("engineNumber").map(str::to_string)),
            ("Manufacture Year", record.field("manufactureYear").map(str::to_string)),
            ("Registration Date", record.field("registrationDate").map(str::to_string)),
            ("Fuel Type", record.field("fuelType").map(str::to_string)),
            ("Color", record.field("color").map(str::to_string)),
            ("Odometer Reading", odometer),
            ("Number of Owners", record.field("ownersCount").map(str::to_string)),
        ],
    )
}

fn owner_card(record: &Record) -> KeyValueCard {
    KeyValueCard::new(
        Columns::Two,
        [
            ("Owner Name", record.field("ownerName")),
            ("Contact Number", record.field("ownerContact")),
            ("Email Address", record.field("ownerEmail")),
            ("Inspection Location", record.field("location")),
        ],
    )
}

fn inspector_card(record: &Record, stamp: &ReportStamp) -> KeyValueCard {
    let date = stamp.date_label();
    KeyValueCard::new(
        Columns::Two,
        [
            ("Inspector Name", record.field("inspectorName")),
            ("Inspection Date", Some(date.as_str())),
        ],
    )
}

/// Multi-line text as one plain line per source line.
fn push_plain_lines(mut text: RichText, body: &str) -> RichText {
    for line in body.lines() {
        text = text.line(vec![Span::plain(line)]);
    }
    text
}

/// One panel per subsystem note that is present, in `NOTE_FIELDS` order.
fn detailed_notes(record: &Record) -> Vec<NarrativePanel> {
    NOTE_FIELDS
        .iter()
        .filter_map(|(field, label)| {
            let note = record.field(field)?;
            let text = RichText::new()
                .line(vec![Span::bold(format!("{label}:")), Span::plain(format!(" {note}"))]);
            Some(NarrativePanel { text })
        })
        .collect()
}

fn issues_and_recommendations(record: &Record) -> Option<NarrativePanel> {
    let issues = record.field("issuesFound");
    let recommendations = record.field("recommendations");
    if issues.is_none() && recommendations.is_none() {
        return None;
    }
    let mut text = RichText::new();
    if let Some(issues) = issues {
        text = push_plain_lines(text.line(vec![Span::bold("Issues Found:")]), issues);
    }
    if let Some(recommendations) = recommendations {
        if !text.lines.is_empty() {
            text = text.blank();
        }
        text = push_plain_lines(text.line(vec![Span::bold("Recommendations:")]), recommendations);
    }
    Some(NarrativePanel { text })
}

fn ratings(record: &Record) -> Result<RatingGroup> {
    let rows = RATING_FIELDS
        .iter()
        .map(|(field, label)| RatingRow::new(*label, record.rating(field)?))
        .collect::<Result<Vec<_>>>()?;
    Ok(RatingGroup { rows })
}

fn photo_cells(record: &Record) -> Vec<ImageGridCell> {
    record
        .images()
        .iter()
        .enumerate()
        .map(|(i, asset)| ImageGridCell {
            caption: PHOTO_CAPTIONS
                .get(i)
                .map(|c| c.to_string())
                .unwrap_or_else(|| title_case(&asset.name)),
            asset: asset.clone(),
        })
        .collect()
}

fn section(blocks: &mut Vec<ContentBlock>, title: &str, body: ContentBlock) {
    blocks.push(ContentBlock::section_title(title));
    blocks.push(body);
    blocks.push(ContentBlock::spacer(SPACE_AFTER_SECTION));
}

/// Assemble the block list for `record`. The same record and stamp always
/// produce the same flow.
pub fn build(record: &Record, style: &Style, stamp: &ReportStamp) -> Result<Flow> {
    // Ratings are required; fail before doing any other work.
    let rating_group = ratings(record)?;

    let mut blocks = vec![
        header(style, stamp),
        ContentBlock::spacer(SPACE_AFTER_HEADER),
    ];
    section(
        &mut blocks,
        "Vehicle Registration Details",
        ContentBlock::KeyValueCard(vehicle_card(record)),
    );
    section(
        &mut blocks,
        "Current Owner Details",
        ContentBlock::KeyValueCard(owner_card(record)),
    );
    section(
        &mut blocks,
        "Inspection Details",
        ContentBlock::KeyValueCard(inspector_card(record, stamp)),
    );

    let highlights = record.field("highlights").unwrap_or(NO_HIGHLIGHTS);
    section(
        &mut blocks,
        "Key Highlights",
        ContentBlock::NarrativePanel(NarrativePanel {
            text: RichText::plain(highlights),
        }),
    );

    let notes = detailed_notes(record);
    if !notes.is_empty() {
        blocks.push(ContentBlock::section_title("Detailed Inspection Notes"));
        for (i, panel) in notes.into_iter().enumerate() {
            if i > 0 {
                blocks.push(ContentBlock::spacer(SPACE_BETWEEN_NOTES));
            }
            blocks.push(ContentBlock::NarrativePanel(panel));
        }
        blocks.push(ContentBlock::spacer(SPACE_AFTER_SECTION));
    }
    if let Some(panel) = issues_and_recommendations(record) {
        section(
            &mut blocks,
            "Issues & Recommendations",
            ContentBlock::NarrativePanel(panel),
        );
    }

    blocks.push(ContentBlock::keep_together(vec![
        ContentBlock::section_title("Overall Ratings"),
        ContentBlock::RatingGroup(rating_group),
    ]));
    blocks.push(ContentBlock::spacer(SPACE_AFTER_RATINGS));

    let rows = image_rows(photo_cells(record));
    for (i, row) in rows.into_iter().enumerate() {
        let row = ContentBlock::ImageRow(row);
        if i == 0 {
            blocks.push(ContentBlock::keep_together(vec![
                ContentBlock::section_title("Vehicle Photos"),
                row,
            ]));
        } else {
            blocks.push(row);
        }
        blocks.push(ContentBlock::spacer(SPACE_AFTER_SECTION));
    }

    if matches!(blocks.last(), Some(ContentBlock::Spacer { .. })) {
        blocks.pop();
    }

    let registration = record.field("registrationNumber").unwrap_or("UNKNOWN");
    Ok(Flow {
        blocks,
        title: format!("{} - {registration}", style.branding.report_title),
        stamp: stamp.clone(),
    })
}

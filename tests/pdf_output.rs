mod common;

use std::io::Cursor;

use inspection_report::{
    Error, ImageAsset, ImageFormat, ReportConfig, generate_report, generate_report_with_stamp,
};
use lopdf::{Document as PdfDocument, Object};

fn load(bytes: &[u8]) -> PdfDocument {
    PdfDocument::load_mem(bytes).expect("generated PDF should parse")
}

fn page_contents(doc: &PdfDocument) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(*id).unwrap()).into_owned())
        .collect()
}

fn image_streams(doc: &PdfDocument) -> Vec<&lopdf::Stream> {
    doc.objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .is_ok_and(|n| n == b"Image")
        })
        .collect()
}

fn png_bytes(alpha: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([200, 30, 30, alpha]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

#[test]
fn page_count_and_footers_in_content_streams() {
    common::init_logger();
    let record = common::sample_record(7);
    let report = generate_report_with_stamp(&record, &ReportConfig::default(), &common::fixed_stamp())
        .expect("generate report");
    assert!(report.pdf.starts_with(b"%PDF-"));

    let doc = load(&report.pdf);
    let n = doc.get_pages().len();
    assert_eq!(n, report.metadata.page_count);
    assert!(n >= 2);

    for (i, content) in page_contents(&doc).iter().enumerate() {
        let label = format!("(Page {} of {})", i + 1, n);
        assert!(content.contains(&label), "page {} lacks {label}", i + 1);
        assert!(content.contains("/F1"));
    }
}

#[test]
fn info_title_and_fonts() {
    let report = generate_report_with_stamp(
        &common::minimal_record(),
        &ReportConfig::default(),
        &common::fixed_stamp(),
    )
    .unwrap();
    let doc = load(&report.pdf);

    let info_id = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .expect("info dictionary");
    let info = doc.get_object(info_id).and_then(Object::as_dict).unwrap();
    let title = info.get(b"Title").and_then(Object::as_str).unwrap();
    assert_eq!(title, b"Vehicle Inspection Report - MH12AB1234");

    let base_fonts: Vec<Vec<u8>> = doc
        .objects
        .values()
        .filter_map(|o| o.as_dict().ok())
        .filter_map(|d| d.get(b"BaseFont").and_then(Object::as_name).ok())
        .map(|n| n.to_vec())
        .collect();
    assert!(base_fonts.contains(&b"Helvetica".to_vec()));
    assert!(base_fonts.contains(&b"Helvetica-Bold".to_vec()));
}

#[test]
fn jpeg_photos_are_embedded_once_each() {
    let report = generate_report_with_stamp(
        &common::sample_record(4),
        &ReportConfig::default(),
        &common::fixed_stamp(),
    )
    .unwrap();
    let doc = load(&report.pdf);
    let images = image_streams(&doc);
    assert_eq!(images.len(), 4);
    for img in images {
        let filter = img.dict.get(b"Filter").and_then(Object::as_name).unwrap();
        assert_eq!(filter, b"DCTDecode");
    }
}

#[test]
fn translucent_png_gets_a_soft_mask() {
    let asset = ImageAsset::new("dash_cam", png_bytes(128), ImageFormat::Png, 4, 3).unwrap();
    let record = common::minimal_record().with_image(asset);
    let report =
        generate_report_with_stamp(&record, &ReportConfig::default(), &common::fixed_stamp())
            .unwrap();
    let doc = load(&report.pdf);
    let images = image_streams(&doc);
    // RGB image plus its alpha mask.
    assert_eq!(images.len(), 2);
    assert!(images.iter().any(|s| s.dict.has(b"SMask")));
}

#[test]
fn opaque_png_has_no_mask() {
    let asset = ImageAsset::new("seat", png_bytes(255), ImageFormat::Png, 4, 3).unwrap();
    let record = common::minimal_record().with_image(asset);
    let report = generate_report(&record, &ReportConfig::default()).unwrap();
    let images = image_streams(&load(&report.pdf)).len();
    assert_eq!(images, 1);
}

#[test]
fn undecodable_png_is_an_image_error() {
    let asset = ImageAsset::new("broken", b"not a png".to_vec(), ImageFormat::Png, 10, 10).unwrap();
    let record = common::minimal_record().with_image(asset);
    let err = generate_report(&record, &ReportConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Image(_)), "{err}");
}

#[test]
fn zero_sized_assets_are_rejected() {
    let err = ImageAsset::new("x", vec![1, 2, 3], ImageFormat::Jpeg, 0, 10).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn metadata_describes_the_report() {
    let stamp = common::fixed_stamp();
    let record = common::minimal_record();
    let report = generate_report_with_stamp(&record, &ReportConfig::default(), &stamp).unwrap();
    let meta = &report.metadata;
    assert_eq!(meta.report_id, "INS-1710498600");
    assert_eq!(meta.artifact_key(), "reports/INS-1710498600.pdf");
    assert_eq!(meta.registration_number, "MH12AB1234");
    assert_eq!(meta.status, "completed");
    assert_eq!(meta.created_at, "2024-03-15T10:30:00+00:00");

    let json = serde_json::to_value(meta).unwrap();
    assert_eq!(json["reportId"], "INS-1710498600");
    assert_eq!(json["ownerName"], "Asha Patil");
    assert_eq!(json["pageCount"], meta.page_count);

    let anonymous = common::with_ratings(inspection_report::Record::new());
    let report = generate_report_with_stamp(&anonymous, &ReportConfig::default(), &stamp).unwrap();
    assert_eq!(report.metadata.registration_number, "UNKNOWN");
    assert_eq!(report.metadata.inspector_name, "UNKNOWN");
}

#[test]
fn documents_can_be_generated_on_other_threads() {
    let handles: Vec<_> = (0..3)
        .map(|i| {
            std::thread::spawn(move || {
                let record = common::sample_record(i);
                generate_report_with_stamp(&record, &ReportConfig::default(), &common::fixed_stamp())
                    .map(|r| r.pdf.len())
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap().unwrap() > 0);
    }
}

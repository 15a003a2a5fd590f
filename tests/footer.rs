mod common;

use common::RecordingBackend;
use inspection_report::{
    ContentBlock, DrawCommand, IconStyle, LayoutContext, PageGeometry, Paint, Style,
    compose_footers, footer_label, paginate,
};

fn paginated(pages: usize) -> inspection_report::Document {
    let geometry = PageGeometry::default();
    let style = Style::default();
    let blocks: Vec<ContentBlock> = (0..pages)
        .map(|_| common::filler(geometry.usable_height()))
        .collect();
    paginate(&blocks, &LayoutContext::new(&geometry, &style)).unwrap()
}

#[test]
fn label_format() {
    assert_eq!(footer_label(1, 1), "Page 1 of 1");
    assert_eq!(footer_label(3, 12), "Page 3 of 12");
}

#[test]
fn every_page_gets_its_own_label() {
    common::init_logger();
    for n in [1, 2, 5] {
        let composed = compose_footers(paginated(n), &Style::default());
        assert_eq!(composed.page_count(), n);
        for (i, page) in composed.pages.iter().enumerate() {
            let texts = common::page_texts(page.commands());
            let label = footer_label(i + 1, n);
            assert_eq!(texts.iter().filter(|t| **t == label).count(), 1, "{texts:?}");
        }
    }
}

#[test]
fn footer_has_contacts_and_disclaimer() {
    let style = Style::default();
    let composed = compose_footers(paginated(2), &style);
    for page in &composed.pages {
        let texts = common::page_texts(page.commands());
        for contact in &style.branding.contacts {
            assert!(texts.contains(&contact.text), "missing {}", contact.text);
        }
        assert!(texts.contains(&style.branding.disclaimer));
    }
}

#[test]
fn background_first_body_then_footer() {
    let geometry = PageGeometry::default();
    let style = Style::default();
    let blocks = [ContentBlock::section_title("Key Highlights")];
    let doc = paginate(&blocks, &LayoutContext::new(&geometry, &style)).unwrap();
    let body_len = doc.pages[0].buffer.len();
    let composed = compose_footers(doc, &style);
    let commands = composed.pages[0].commands();

    let DrawCommand::Rect { rect, paint } = &commands[0] else {
        panic!("background fill should come first");
    };
    assert_eq!((rect.width, rect.height), (geometry.page_width, geometry.page_height));
    assert_eq!(*paint, Paint::fill(style.palette.page_background));

    // Body replayed verbatim straight after the background.
    let DrawCommand::Text(run) = &commands[1 + body_len - 1] else {
        panic!("section title text expected at the end of the body");
    };
    assert_eq!(run.text, "Key Highlights");

    // Footer content sits inside the band above the bottom margin.
    let band_top = geometry.margin + geometry.footer_band_height;
    for cmd in &commands[1 + body_len..] {
        if let DrawCommand::Text(run) = cmd {
            assert!(run.y > geometry.margin && run.y < band_top, "{run:?}");
        }
    }
}

#[test]
fn outline_icons_are_not_filled() {
    let style = Style {
        icon_style: IconStyle::Outline,
        ..Style::default()
    };
    let composed = compose_footers(paginated(1), &style);
    let contact_colors: Vec<_> = style.branding.contacts.iter().map(|c| c.color).collect();
    for cmd in composed.pages[0].commands() {
        match cmd {
            DrawCommand::Circle { paint, .. } => assert!(paint.fill.is_none()),
            DrawCommand::Rect { paint, .. } => {
                if let Some(fill) = paint.fill {
                    assert!(!contact_colors.contains(&fill));
                }
            }
            _ => {}
        }
    }
}

#[test]
fn replay_visits_pages_in_order() {
    let geometry = PageGeometry::default();
    let composed = compose_footers(paginated(3), &Style::default());
    let recorded = composed.replay_into(RecordingBackend::default()).unwrap();
    assert_eq!(recorded.pages.len(), 3);
    assert!(
        recorded
            .sizes
            .iter()
            .all(|s| *s == (geometry.page_width, geometry.page_height))
    );
    for (i, page) in recorded.pages.iter().enumerate() {
        assert_eq!(page.len(), composed.pages[i].len());
        assert!(common::page_texts(page).contains(&footer_label(i + 1, 3)));
    }
}

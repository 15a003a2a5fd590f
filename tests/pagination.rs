mod common;

use inspection_report::{
    BlockKind, ContentBlock, Error, KeepTogetherGroup, LayoutContext, PageGeometry, RatingGroup,
    RatingRow, Style, image_rows, ImageGridCell, flow, paginate,
};
use proptest::prelude::*;
use std::sync::Arc;

fn run(blocks: &[ContentBlock]) -> inspection_report::Document {
    let geometry = PageGeometry::default();
    let style = Style::default();
    paginate(blocks, &LayoutContext::new(&geometry, &style)).expect("paginate")
}

fn ratings_group() -> ContentBlock {
    let rows = [4.0, 4.5, 4.0, 5.0, 4.5, 4.0]
        .into_iter()
        .enumerate()
        .map(|(i, s)| RatingRow::new(format!("Row {i}"), s).unwrap())
        .collect();
    ContentBlock::keep_together(vec![
        ContentBlock::section_title("Overall Ratings"),
        ContentBlock::RatingGroup(RatingGroup { rows }),
    ])
}

fn photo_blocks(n: usize) -> Vec<ContentBlock> {
    let cells = (0..n)
        .map(|i| ImageGridCell {
            asset: Arc::new(common::fake_jpeg(&format!("p{i}"))),
            caption: format!("Photo {i}"),
        })
        .collect();
    let mut blocks = Vec::new();
    for (i, row) in image_rows(cells).into_iter().enumerate() {
        let row = ContentBlock::ImageRow(row);
        if i == 0 {
            blocks.push(ContentBlock::keep_together(vec![
                ContentBlock::section_title("Vehicle Photos"),
                row,
            ]));
        } else {
            blocks.push(ContentBlock::spacer(12.0));
            blocks.push(row);
        }
    }
    blocks
}

fn block_strategy() -> impl Strategy<Value = ContentBlock> {
    prop_oneof![
        (0.0f32..200.0).prop_map(ContentBlock::spacer),
        (1.0f32..300.0).prop_map(common::filler),
        prop::collection::vec(1.0f32..150.0, 1..4).prop_map(|hs| {
            ContentBlock::KeepTogether(KeepTogetherGroup {
                blocks: hs.into_iter().map(ContentBlock::spacer).collect(),
                spacing: 6.0,
            })
        }),
    ]
}

proptest! {
    #[test]
    fn pages_never_exceed_usable_height(blocks in prop::collection::vec(block_strategy(), 0..40)) {
        let geometry = PageGeometry::default();
        let doc = run(&blocks);
        let usable = geometry.usable_height();
        let mut placed = 0;
        for page in &doc.pages {
            prop_assert!(page.used_height() <= usable + 1e-2, "page {} holds {}", page.number, page.used_height());
            let mut expected_top = geometry.margin;
            for p in &page.placements {
                prop_assert!((p.top - expected_top).abs() < 1e-2);
                expected_top += p.height;
            }
            placed += page.placements.len();
        }
        for page in doc.pages.iter().skip(1) {
            prop_assert_ne!(page.placements[0].kind, BlockKind::Spacer);
        }
        // Every block is placed once, in order, with no empty pages.
        prop_assert!(doc.pages.iter().all(|p| !p.placements.is_empty()) || blocks.is_empty());
        prop_assert!(placed <= blocks.len());
        let numbers: Vec<usize> = doc.pages.iter().map(|p| p.number).collect();
        let expected: Vec<usize> = (1..=doc.pages.len()).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn fitting_groups_are_never_split(heights in prop::collection::vec(20.0f32..400.0, 1..20)) {
        let blocks: Vec<ContentBlock> = heights
            .iter()
            .map(|h| ContentBlock::keep_together(vec![
                ContentBlock::spacer(h / 2.0),
                ContentBlock::spacer(h / 2.0),
            ]))
            .collect();
        let doc = run(&blocks);
        let placed: usize = doc.pages.iter().map(|p| p.placements.len()).sum();
        prop_assert_eq!(placed, blocks.len());
        for page in &doc.pages {
            for p in &page.placements {
                prop_assert_eq!(p.kind, BlockKind::KeepTogether);
            }
        }
    }
}

#[test]
fn empty_flow_gives_one_empty_page() {
    let doc = run(&[]);
    assert_eq!(doc.page_count(), 1);
    assert!(doc.pages[0].placements.is_empty());
}

#[test]
fn block_that_does_not_fit_moves_to_next_page() {
    let usable = PageGeometry::default().usable_height();
    let doc = run(&[common::filler(usable - 10.0), common::filler(20.0)]);
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.pages[1].placements[0].top, PageGeometry::default().margin);
}

#[test]
fn exact_fit_stays_on_the_page() {
    let usable = PageGeometry::default().usable_height();
    let doc = run(&[common::filler(usable * 0.5), common::filler(usable * 0.5)]);
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn oversized_block_is_placed_alone() {
    common::init_logger();
    let usable = PageGeometry::default().usable_height();
    let doc = run(&[
        common::filler(100.0),
        common::filler(usable * 1.5),
        common::filler(50.0),
    ]);
    assert_eq!(doc.page_count(), 3);
    assert_eq!(doc.pages[1].placements.len(), 1);
    assert_eq!(doc.pages[1].placements[0].height, usable * 1.5);

    // No blank page when the oversized block comes first.
    let doc = run(&[common::filler(usable * 2.0)]);
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn leading_spacer_does_not_strand_a_blank_page() {
    let usable = PageGeometry::default().usable_height();
    let doc = run(&[
        common::filler(usable - 5.0),
        ContentBlock::spacer(12.0),
        common::filler(usable * 1.2),
    ]);
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.pages[1].placements.len(), 1);
}

#[test]
fn spacer_at_a_page_break_is_dropped() {
    let geometry = PageGeometry::default();
    let usable = geometry.usable_height();
    let doc = run(&[
        common::filler(usable - 5.0),
        ContentBlock::spacer(12.0),
        common::filler(100.0),
    ]);
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.pages[0].kinds().collect::<Vec<_>>(), [BlockKind::KeepTogether]);
    let page2 = &doc.pages[1];
    assert_eq!(page2.kinds().collect::<Vec<_>>(), [BlockKind::KeepTogether]);
    assert_eq!(page2.placements[0].top, geometry.margin);

    // A spacer that still fits stays where it is.
    let doc = run(&[
        common::filler(usable - 20.0),
        ContentBlock::spacer(12.0),
        common::filler(100.0),
    ]);
    assert_eq!(doc.pages[0].kinds().last(), Some(BlockKind::Spacer));
    assert_eq!(doc.pages[1].placements[0].top, geometry.margin);
}

#[test]
fn invalid_heights_are_rejected() {
    let geometry = PageGeometry::default();
    let style = Style::default();
    let ctx = LayoutContext::new(&geometry, &style);
    for h in [-1.0, f32::NAN, f32::INFINITY] {
        let err = paginate(&[ContentBlock::spacer(h)], &ctx).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    let bad = PageGeometry {
        margin: f32::NAN,
        ..PageGeometry::default()
    };
    let err = paginate(&[], &LayoutContext::new(&bad, &style)).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn scenario_b_content_of_two_point_three_pages() {
    common::init_logger();
    let geometry = PageGeometry::default();
    let style = Style::default();
    let usable = geometry.usable_height();

    let ratings = ratings_group();
    let photos = photo_blocks(5);
    let ratings_h = common::measure(&ratings, &geometry, &style);
    let photos_h: f32 = photos.iter().map(|b| common::measure(b, &geometry, &style)).sum();
    let second_filler = 1.3 * usable - ratings_h - photos_h;
    assert!(second_filler > 0.0);

    let mut blocks = vec![common::filler(usable), common::filler(second_filler), ratings];
    blocks.extend(photos);
    let total: f32 = blocks.iter().map(|b| common::measure(b, &geometry, &style)).sum();
    assert!((total - 2.3 * usable).abs() < 0.01);

    let doc = run(&blocks);
    assert_eq!(doc.page_count(), 3);

    let kinds = |i: usize| doc.pages[i].kinds().collect::<Vec<_>>();
    assert_eq!(kinds(0), [BlockKind::KeepTogether]);
    assert_eq!(doc.pages[0].used_height(), usable);

    // The ratings group lands whole on page 2 after the second filler.
    assert_eq!(kinds(1), [BlockKind::KeepTogether, BlockKind::KeepTogether]);
    assert_eq!(doc.pages[1].placements[1].caption.as_deref(), Some("Overall Ratings"));

    // Page 3 holds only the photo grid.
    let page3 = &doc.pages[2];
    assert_eq!(page3.placements[0].caption.as_deref(), Some("Vehicle Photos"));
    assert!(page3.kinds().all(|k| matches!(
        k,
        BlockKind::KeepTogether | BlockKind::ImageRow | BlockKind::Spacer
    )));
    assert_eq!(page3.kinds().filter(|k| *k == BlockKind::ImageRow).count(), 1);
}

#[test]
fn sample_report_paginates_within_bounds() {
    let geometry = PageGeometry::default();
    let style = Style::default();
    let record = common::sample_record(7);
    let flow = flow::build(&record, &style, &common::fixed_stamp()).unwrap();
    let doc = paginate(&flow.blocks, &LayoutContext::new(&geometry, &style)).unwrap();
    assert!(doc.page_count() >= 2);
    for page in &doc.pages {
        assert!(page.used_height() <= geometry.usable_height() + 1e-2);
        assert!(!page.buffer.is_empty());
    }
    // The ratings title is never separated from its card.
    let ratings_pages: Vec<usize> = doc
        .pages
        .iter()
        .filter(|p| p.placements.iter().any(|pl| pl.caption.as_deref() == Some("Overall Ratings")))
        .map(|p| p.number)
        .collect();
    assert_eq!(ratings_pages.len(), 1);
}

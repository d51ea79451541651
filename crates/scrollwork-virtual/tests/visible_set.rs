use std::sync::Arc;

use proptest::prelude::*;
use scrollwork_core::*;
use scrollwork_virtual::*;

#[derive(Debug)]
struct Cell {
    placement: Option<Placement>,
}

impl Element for Cell {
    fn place(&mut self, placement: &Placement) {
        self.placement = Some(*placement);
    }
}

const KINDS: [BlockKind; 3] = [BlockKind::ROW, BlockKind::TEXT, BlockKind::IMAGE];

fn registry() -> ElementRegistry<Cell> {
    KINDS.iter().fold(ElementRegistry::new(), |reg, kind| {
        reg.with(kind.clone(), || Cell { placement: None })
    })
}

/// Arbitrary frames, including inverted and zero-height ones.
fn synthetic_layout(frames: &[(f32, f32, usize)], total_height: f32) -> Layout {
    let mut layout = Layout::empty(400.0);
    layout.total_height = total_height;
    layout.items = frames
        .iter()
        .enumerate()
        .map(|(i, &(top, height, kind))| DisplayItem {
            frame: Rect::new(0.0, top, 400.0, top + height),
            clip: None,
            paint_order: i as u32,
            kind: KINDS[kind].clone(),
            source: ItemRef::Row { row: i },
        })
        .collect();
    layout
}

fn expected(layout: &Layout, offset: f32, height: f32) -> Vec<usize> {
    layout
        .items
        .iter()
        .enumerate()
        .filter(|(_, it)| it.frame.bottom > offset && it.frame.top < offset + height)
        .map(|(i, _)| i)
        .collect()
}

/// Rows of stacked blocks as `(top margin, bottom margin, height)`.
fn stacked_rows() -> impl Strategy<Value = Vec<Vec<(f32, f32, f32)>>> {
    let block = (0.0f32..30.0, 0.0f32..30.0, 0.0f32..200.0);
    prop::collection::vec(prop::collection::vec(block, 0..6), 0..20)
}

fn frames() -> impl Strategy<Value = Vec<(f32, f32, usize)>> {
    prop::collection::vec((-200.0f32..3000.0, -50.0f32..400.0, 0usize..3), 0..120)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn visible_set_matches_overlap_definition(
        frames in frames(),
        total in 0.0f32..4000.0,
        viewport in 1.0f32..900.0,
        deltas in prop::collection::vec(-1500.0f32..1500.0, 1..12),
        indexed in any::<bool>(),
    ) {
        let layout = Arc::new(synthetic_layout(&frames, total));
        let config = VirtualizerConfig::default()
            .report(ReportPolicy::Log)
            .index_threshold(if indexed { 0 } else { usize::MAX })
            .bucket_size(97.0);
        let binder = |_: &mut Cell, _: &DisplayItem| {};
        let mut manager = VirtualizationManager::with_config(config, registry(), binder);
        manager.set_viewport(400.0, viewport, layout.clone()).unwrap();

        for delta in deltas {
            manager.scroll_by(delta);
            let offset = manager.offset();
            prop_assert!(offset >= 0.0 && offset <= layout.max_offset(viewport));

            let want = expected(&layout, offset, viewport);
            prop_assert_eq!(manager.visible_indices(), want.as_slice());

            let stats = manager.stats();
            prop_assert_eq!(stats.items_in_use, want.len());
            prop_assert_eq!(stats.items_in_use + stats.items_in_pool, stats.total_created);

            for &i in &want {
                let placed = manager.bound_element(i).and_then(|c| c.placement);
                let top = layout.items[i].frame.top - offset;
                prop_assert_eq!(placed.map(|p| p.frame.top), Some(top));
            }
        }
        prop_assert!(manager.config_errors().is_empty());
    }

    #[test]
    fn span_index_agrees_with_scan(
        frames in frames(),
        bucket in 1.0f32..800.0,
        start in -400.0f32..3500.0,
        height in 0.0f32..1200.0,
    ) {
        let layout = synthetic_layout(&frames, 0.0);
        let index = SpanIndex::build(&layout.items, bucket);
        prop_assert_eq!(
            index.query(&layout.items, start, start + height),
            scrollwork_virtual::index::scan(&layout.items, start, start + height)
        );
    }

    #[test]
    fn stacked_rows_tile_the_screen(rows in stacked_rows()) {
        let screen = Screen::new("p").with_rows(
            rows.iter()
                .enumerate()
                .map(|(r, blocks)| {
                    Row::new(format!("r{r}")).with_blocks(
                        blocks
                            .iter()
                            .enumerate()
                            .map(|(b, &(top, bottom, h))| {
                                let vertical =
                                    VerticalAlignment::stacked(top, bottom, Height::Static(h));
                                Block::new(format!("r{r}b{b}"), Payload::empty(BlockKind::TEXT))
                                    .vertical(vertical)
                            })
                            .collect(),
                    )
                })
                .collect(),
        );
        let layout = scrollwork_layout::solve(&screen, 320.0, &NoMeasurer);

        let mut cursor = 0.0f32;
        for item in layout.items.iter().filter(|it| !it.source.is_block()) {
            prop_assert!((item.frame.top - cursor).abs() < 1e-3);
            cursor = item.frame.bottom;
        }
        prop_assert!((layout.total_height - cursor).abs() < 1e-3);

        for item in layout.items.iter().filter(|it| it.source.is_block()) {
            prop_assert!(item.clip.is_none());
        }
        let orders: Vec<u32> = layout.items.iter().map(|it| it.paint_order).collect();
        prop_assert!(orders.windows(2).all(|w| w[0] < w[1]));
    }
}

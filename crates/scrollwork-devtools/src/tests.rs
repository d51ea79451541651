#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scrollwork_core::*;
    use scrollwork_virtual::*;
    use web_time::{Duration, Instant};

    use crate::*;

    struct Tile;

    impl Element for Tile {
        fn place(&mut self, _placement: &Placement) {}
    }

    fn scrolled_manager(
        offset: f32,
    ) -> VirtualizationManager<ElementRegistry<Tile>, impl Binder<Tile>> {
        let screen = Screen::new("s").with_rows(
            (0..10)
                .map(|i| {
                    let block = Block::new(format!("b{i}"), Payload::empty(BlockKind::RECTANGLE))
                        .vertical(VerticalAlignment::stacked(0.0, 0.0, Height::Static(100.0)));
                    Row::new(format!("r{i}")).block(block)
                })
                .collect(),
        );
        let layout = Arc::new(scrollwork_layout::solve(&screen, 320.0, &NoMeasurer));
        let registry = ElementRegistry::new()
            .with(BlockKind::ROW, || Tile)
            .with(BlockKind::RECTANGLE, || Tile);
        let mut manager = VirtualizationManager::with_config(
            VirtualizerConfig::default().report(ReportPolicy::Log),
            registry,
            |_: &mut Tile, _: &DisplayItem| {},
        );
        manager.set_viewport(320.0, 250.0, layout).unwrap();
        manager.scroll_by(offset);
        manager
    }

    #[test]
    fn test_frame_clock_smoothing() {
        let mut clock = FrameClock::default();
        let t0 = Instant::now();
        clock.tick(t0);
        assert_eq!(clock.fps(), 0.0);

        clock.tick(t0 + Duration::from_millis(10));
        assert!((clock.fps() - 100.0).abs() < 0.5);

        // A 50 fps frame pulls the average a fifth of the way down.
        clock.tick(t0 + Duration::from_millis(30));
        assert!((clock.fps() - 90.0).abs() < 0.5, "{}", clock.fps());
        assert_eq!(clock.frames(), 3);
    }

    #[test]
    fn test_disabled_inspector_still_counts_frames() {
        let mut inspector = Inspector::new();
        assert!(inspector.frame(Instant::now()).is_none());
        assert_eq!(inspector.clock().frames(), 1);

        inspector.toggle();
        assert!(inspector.is_enabled());
        let overlay = inspector.frame(Instant::now()).expect("overlay");
        assert!(overlay.text().starts_with("frame 2 @ "));
        assert_eq!(overlay.highlight, None);
    }

    #[test]
    fn test_snapshot_reports_window_and_pool() {
        let manager = scrolled_manager(150.0);
        let mut inspector = Inspector::new();
        inspector.toggle();
        inspector.observe(&manager, 1.234);

        let snapshot = inspector.snapshot().expect("snapshot");
        assert_eq!(snapshot.items, 20);
        assert_eq!(snapshot.visible, 6);
        assert_eq!((snapshot.offset, snapshot.max_offset), (150.0, 750.0));
        assert!((snapshot.progress() - 0.2).abs() < 1e-6);
        assert_eq!(snapshot.pool, manager.stats());
        assert!(snapshot.reuse_ratio() > 0.0);

        let overlay = inspector.frame(Instant::now()).expect("overlay");
        assert_eq!(overlay.lines[1], "solve: 1.23 ms");
        assert_eq!(overlay.lines[2], "items: 6/20 visible");
        assert_eq!(overlay.lines[3], "offset: 150/750 (20%)");
        assert!(overlay.lines[4].starts_with("pool: 6 in use"));
    }

    #[test]
    fn test_hover_highlights_in_viewport_coordinates() {
        let manager = scrolled_manager(150.0);
        let mut inspector = Inspector::new();
        inspector.toggle();
        inspector.hover(&manager, Vec2 { x: 10.0, y: 10.0 });

        let hover = inspector.hovered().cloned().expect("hover");
        assert_eq!(hover.index, 3);
        assert_eq!(hover.kind, BlockKind::RECTANGLE);
        assert_eq!(hover.frame, Rect::new(0.0, -50.0, 320.0, 50.0));

        let overlay = inspector.frame(Instant::now()).expect("overlay");
        assert_eq!(overlay.lines.last().map(String::as_str), Some("hover: #3 rectangle"));
        assert_eq!(overlay.highlight.map(|(r, _)| r), Some(hover.frame));

        inspector.hover(&manager, Vec2 { x: 10.0, y: 5000.0 });
        assert!(inspector.hovered().is_none());
    }

    #[test]
    fn test_empty_snapshot_ratios() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.reuse_ratio(), 0.0);
        assert_eq!(snapshot.progress(), 0.0);
    }
}

use std::sync::Arc;

use scrollwork_core::*;
use scrollwork_devtools::Inspector;
use scrollwork_virtual::*;
use web_time::{Duration, Instant};

const VIEWPORT_W: f32 = 360.0;
const VIEWPORT_H: f32 = 640.0;

/// Stand-in for a host view: remembers what it was last told to show.
#[derive(Debug)]
struct Surface {
    kind: BlockKind,
    frame: Rect,
    shown: bool,
    label: String,
}

impl Surface {
    fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            frame: Rect::ZERO,
            shown: false,
            label: String::new(),
        }
    }
}

impl Element for Surface {
    fn place(&mut self, placement: &Placement) {
        self.frame = placement.frame;
        self.shown = true;
    }

    fn recycle(&mut self) {
        self.shown = false;
        self.label.clear();
    }
}

/// Roughly 8 px per glyph, 20 px per line.
fn measure_text(payload: &Payload, width: f32) -> f32 {
    let chars = payload
        .downcast_ref::<String>()
        .map_or(0, |s| s.chars().count()) as f32;
    if width <= 0.0 || chars == 0.0 {
        return 0.0;
    }
    let per_line = (width / 8.0).floor().max(1.0);
    (chars / per_line).ceil() * 20.0
}

fn article(index: usize) -> Row {
    let title = format!("Story #{index}");
    let body = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(1 + index % 4);
    let mut row = Row::new(format!("story-{index}"))
        .background(Background::Color(Color::from_hex("#1E1E1E")))
        .block(
            Block::new(
                format!("story-{index}-image"),
                Payload::new(BlockKind::IMAGE, format!("hero-{index}.png")),
            )
            .vertical(VerticalAlignment::stacked(0.0, 8.0, Height::Static(180.0))),
        )
        .block(
            Block::new(
                format!("story-{index}-title"),
                Payload::new(BlockKind::TEXT, title),
            )
            .insets(Insets::symmetric(16.0, 4.0))
            .vertical(VerticalAlignment::stacked(0.0, 0.0, Height::Intrinsic)),
        )
        .block(
            Block::new(format!("story-{index}-body"), Payload::new(BlockKind::TEXT, body))
                .insets(Insets::symmetric(16.0, 4.0))
                .vertical(VerticalAlignment::stacked(0.0, 12.0, Height::Intrinsic))
                .on_tap(TapAction::GoToScreen {
                    screen_id: format!("story-{index}"),
                }),
        );
    if index % 5 == 0 {
        // A badge hanging over the top edge of the row.
        row = row.block(
            Block::new(
                format!("story-{index}-badge"),
                Payload::new(BlockKind::BUTTON, String::from("NEW")),
            )
            .horizontal(HorizontalAlignment::right(12.0, 56.0))
            .insets(Insets::all(4.0))
            .vertical(VerticalAlignment::top(-10.0, Height::Static(24.0)))
            .border(Border {
                width: 1.0,
                radius: 12.0,
                color: Color::WHITE,
            })
            .on_tap(TapAction::OpenUrl {
                url: format!("https://example.com/story/{index}"),
            }),
        );
    }
    row
}

fn hud_frame<F, B>(
    inspector: &mut Inspector,
    manager: &VirtualizationManager<F, B>,
    solve_ms: f32,
    now: Instant,
) where
    F: ElementFactory,
    B: Binder<F::Element>,
{
    inspector.observe(manager, solve_ms);
    if let Some(overlay) = inspector.frame(now) {
        log::info!("{}", overlay.text());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting screen scroll demo");

    let screen = Screen::new("feed")
        .background(Background::Color(Color::from_hex("#121212")))
        .with_rows((0..400).map(article).collect());

    let measurers = MeasurerRegistry::new().with(BlockKind::TEXT, measure_text);

    let started = Instant::now();
    let layout = Arc::new(scrollwork_layout::solve(&screen, VIEWPORT_W, &measurers));
    let solve_ms = started.elapsed().as_secs_f32() * 1000.0;
    log::info!(
        "solved {} items, {:.0} px tall, {} diagnostics in {solve_ms:.2} ms",
        layout.len(),
        layout.total_height,
        layout.diagnostics.len()
    );
    for error in layout.config_errors() {
        log::warn!("content problem: {error}");
    }

    let factory = [
        BlockKind::ROW,
        BlockKind::IMAGE,
        BlockKind::TEXT,
        BlockKind::BUTTON,
    ]
    .into_iter()
    .fold(ElementRegistry::new(), |registry, kind| {
        let k = kind.clone();
        registry.with(kind, move || Surface::new(k.clone()))
    });
    let binder = |surface: &mut Surface, item: &DisplayItem| {
        surface.label = match screen.resolve(item.source) {
            Some(Source::Block(block)) => block
                .payload
                .downcast_ref::<String>()
                .cloned()
                .unwrap_or_else(|| block.kind().to_string()),
            Some(Source::Row(row)) => row.id.clone(),
            None => String::new(),
        };
    };

    let mut manager = VirtualizationManager::with_config(
        VirtualizerConfig::default().report(ReportPolicy::Log),
        factory,
        binder,
    );
    manager.set_viewport(VIEWPORT_W, VIEWPORT_H, layout.clone())?;

    let mut inspector = Inspector::new();
    inspector.toggle();
    let mut now = Instant::now();
    // Drag in small steps, as a finger would.
    for _ in 0..120 {
        now += Duration::from_millis(16);
        manager.scroll_by(24.0);
        hud_frame(&mut inspector, &manager, solve_ms, now);
    }

    // Release into a fling; warm up where it is heading.
    let mut fling = FlingState::default();
    fling.start(4200.0, now);
    let upcoming = manager.fling_prefetch_candidates(&fling);
    log::info!(
        "fling projected {:.0} px, {} items to prefetch",
        fling.projected_distance(),
        upcoming.len()
    );
    loop {
        now += Duration::from_millis(16);
        let running = manager.step_fling(&mut fling, now);
        hud_frame(&mut inspector, &manager, solve_ms, now);
        if !running {
            break;
        }
    }

    let tap = Vec2 { x: 40.0, y: 300.0 };
    inspector.hover(&manager, tap);
    hud_frame(&mut inspector, &manager, solve_ms, now);
    if let Some((index, item)) = manager.hit_test(tap) {
        log::info!("tap at {tap:?} hits item {index} ({})", item.kind);
        let content = Vec2 {
            x: tap.x,
            y: tap.y + manager.offset(),
        };
        match scrollwork_layout::tap_target(&screen, &layout, content) {
            Some(action) => log::info!("tap action: {action:?}"),
            None => log::info!("nothing to do"),
        }
    }

    manager.scroll_to(manager.max_offset());
    log::info!(
        "at bottom: {:?}, offset {:.0}, pool {:?}",
        manager.edges(),
        manager.offset(),
        manager.stats()
    );
    for (index, item) in manager.visible_items().take(3) {
        if let Some(surface) = manager.bound_element(index) {
            log::debug!(
                "{index}: {} as {:?} at {:?}, shown {} ({})",
                item.kind,
                surface.kind,
                surface.frame,
                surface.shown,
                surface.label
            );
        }
    }
    Ok(())
}

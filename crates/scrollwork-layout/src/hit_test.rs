use scrollwork_core::{DisplayItem, Layout, Screen, Source, TapAction, Vec2};

/// Topmost block whose visible (clipped) region contains `point`, in screen
/// coordinates. Walks `layout.hit_order`, which is independent of paint
/// order; row backgrounds are never returned.
pub fn hit_test(layout: &Layout, point: Vec2) -> Option<(usize, &DisplayItem)> {
    layout.hit_order.iter().find_map(|&index| {
        let item = layout.items.get(index)?;
        item.visible_frame()
            .filter(|r| r.contains(point))
            .map(|_| (index, item))
    })
}

/// The tap action under `point`. Blocks without an action are transparent to
/// taps so that actionable blocks beneath them still receive the event.
pub fn tap_target<'s>(screen: &'s Screen, layout: &Layout, point: Vec2) -> Option<&'s TapAction> {
    layout.hit_order.iter().find_map(|&index| {
        let item = layout.items.get(index)?;
        item.visible_frame().filter(|r| r.contains(point))?;
        match screen.resolve(item.source)? {
            Source::Block(block) => block.tap_action.as_ref(),
            Source::Row(_) => None,
        }
    })
}

//! Batch scenarios driven through the JSON decoding path
//!
//! These tests feed complete redraw batches through `decode_batch` and the
//! renderer, then inspect the recording surface - the same path the
//! headless runner uses.

use std::sync::mpsc;

use serde_json::json;

use neoscreen::{
    decode_batch, ChannelResolver, ColorResolution, Dimensions, NullResolver, RecordingSurface,
    RedrawEvent, Renderer, RgbColor, SurfaceCall,
};

fn renderer(cols: usize, rows: usize) -> Renderer<RecordingSurface> {
    let dims = Dimensions::new(cols, rows);
    Renderer::new(dims, RecordingSurface::new(dims), Box::new(NullResolver))
}

fn apply(renderer: &mut Renderer<RecordingSurface>, batch: serde_json::Value) {
    let events = decode_batch(&batch).expect("valid batch");
    renderer.apply_batch(&events);
}

#[test]
fn test_clear_highlight_put_scenario() {
    let mut r = renderer(80, 24);
    apply(
        &mut r,
        json!([
            ["clear", []],
            ["highlight_set", [{ "foreground": 0xff0000, "background": 0x000000 }]],
            ["put", ["A"], ["B"], ["C"]]
        ]),
    );

    let red = RgbColor::new(0xff, 0, 0);
    let black = RgbColor::new(0, 0, 0);
    for (col, glyph) in ["A", "B", "C"].iter().enumerate() {
        let texel = r.surface().texel(col, 0).unwrap();
        assert_eq!(texel.glyph.as_deref(), Some(*glyph));
        assert_eq!(texel.fg, Some(red));
        assert_eq!(texel.bg, Some(black));
    }
    assert_eq!(r.state().cursor.row, 0);
    assert_eq!(r.state().cursor.col, 3);
}

#[test]
fn test_put_wraps_at_last_column() {
    // Wrap boundary is pinned at col >= cols: a glyph written in the last
    // column moves the cursor to the start of the next row
    let mut r = renderer(80, 24);
    apply(
        &mut r,
        json!([["cursor_goto", [0, 79]], ["put", ["X"], ["Y"]]]),
    );

    assert_eq!(r.surface().texel(79, 0).unwrap().glyph.as_deref(), Some("X"));
    assert_eq!(r.surface().texel(0, 1).unwrap().glyph.as_deref(), Some("Y"));
    assert_eq!(r.state().cursor.row, 1);
    assert_eq!(r.state().cursor.col, 1);
}

#[test]
fn test_empty_put_is_a_complete_no_op() {
    let mut r = renderer(80, 24);
    let cursor_before = r.state().cursor;
    let attrs_before = r.state().attrs;
    apply(&mut r, json!([["put"]]));

    assert_eq!(r.state().cursor, cursor_before);
    assert_eq!(r.state().attrs, attrs_before);
    // No fills, no color changes, no glyphs
    assert!(!r.surface().calls().iter().any(|c| !matches!(
        c,
        SurfaceCall::RepaintCursor
    )));
}

#[test]
fn test_update_fg_negative_never_changes_foreground() {
    let mut r = renderer(80, 24);
    apply(&mut r, json!([["update_fg", [0x336699]]]));
    let before = r.state().colors.foreground;
    apply(&mut r, json!([["update_fg", [-1]], ["clear", []]]));
    assert_eq!(r.state().colors.foreground, before);
}

#[test]
fn test_scroll_region_is_unset_after_every_batch() {
    let mut r = renderer(80, 24);
    apply(
        &mut r,
        json!([["set_scroll_region", [5, 10, 0, 79]]]),
    );
    // The region was never consumed by a scroll, but batch end clears it:
    // the next scroll uses the full grid
    assert_eq!(r.state().scroll_region, None);
    apply(&mut r, json!([["scroll", [1]]]));
    assert!(r.surface().calls().contains(&SurfaceCall::GetBlock {
        col: 0,
        row: 1,
        width: 80,
        height: 23
    }));
}

#[test]
fn test_scroll_up_then_down_restores_interior() {
    let mut r = renderer(20, 10);
    // Lay down distinguishable content
    apply(
        &mut r,
        json!([
            ["cursor_goto", [4, 2]],
            ["put", ["a"], ["b"], ["c"]],
            ["cursor_goto", [5, 2]],
            ["put", ["d"], ["e"], ["f"]]
        ]),
    );
    let before: Vec<_> = (0..10)
        .flat_map(|row| (0..20).map(move |col| (col, row)))
        .map(|(col, row)| r.surface().texel(col, row).unwrap().clone())
        .collect();

    apply(
        &mut r,
        json!([
            ["set_scroll_region", [2, 7, 0, 19]],
            ["scroll", [2]],
            ["set_scroll_region", [2, 7, 0, 19]],
            ["scroll", [-2]]
        ]),
    );

    // Rows 4..=7 of the region survived both moves; only rows 2..=3 were
    // exposed by the down-scroll fill
    for row in 4..=7 {
        for col in 0..20 {
            assert_eq!(
                r.surface().texel(col, row).unwrap(),
                &before[row * 20 + col],
                "texel ({col},{row}) changed"
            );
        }
    }
}

#[test]
fn test_scrolled_glyphs_move_without_redraw() {
    let mut r = renderer(20, 10);
    apply(
        &mut r,
        json!([["cursor_goto", [5, 0]], ["put", ["h"], ["i"]]]),
    );
    r.surface_mut().clear_calls();
    apply(&mut r, json!([["scroll", [2]]]));

    // The glyphs land two rows up via the block copy, with no draw calls
    assert_eq!(r.surface().texel(0, 3).unwrap().glyph.as_deref(), Some("h"));
    assert_eq!(r.surface().texel(1, 3).unwrap().glyph.as_deref(), Some("i"));
    assert!(!r
        .surface()
        .calls()
        .iter()
        .any(|c| matches!(c, SurfaceCall::DrawGlyph { .. })));
}

#[test]
fn test_unknown_instruction_has_no_effect() {
    let mut r = renderer(80, 24);
    apply(
        &mut r,
        json!([["grid_resize", [1, 120, 40]], ["flush", []]]),
    );
    assert!(r
        .surface()
        .calls()
        .iter()
        .all(|c| matches!(c, SurfaceCall::RepaintCursor)));
}

#[test]
fn test_mode_color_fallback_applies_to_cursor() {
    // Resolution yields no background: the mode's cursor color falls back
    // to the foreground current at completion time
    let (tx, rx) = mpsc::channel();
    let dims = Dimensions::new(80, 24);
    let mut r = Renderer::new(
        dims,
        RecordingSurface::new(dims),
        Box::new(ChannelResolver::new(|_| None, tx)),
    );

    apply(
        &mut r,
        json!([
            ["update_fg", [0x99aabb]],
            ["mode_info_set", [true, [
                { "name": "operator", "cursor_shape": "horizontal", "cell_percentage": 50, "hl_id": 62 }
            ]]]
        ]),
    );
    // The completion lands after another batch has run
    apply(&mut r, json!([["clear", []]]));
    r.drain_resolutions(&rx);

    apply(&mut r, json!([["mode_change", ["operator", 2]]]));
    assert_eq!(r.cursor_color(), RgbColor::new(0x99, 0xaa, 0xbb));
    assert!(r.surface().calls().iter().any(|c| matches!(
        c,
        SurfaceCall::SetCursorShape { size: Some(50), .. }
    )));
}

#[test]
fn test_resolved_background_becomes_cursor_color() {
    let (tx, rx) = mpsc::channel();
    let dims = Dimensions::new(80, 24);
    let mut r = Renderer::new(
        dims,
        RecordingSurface::new(dims),
        Box::new(ChannelResolver::new(|hl_id| Some(hl_id as i64), tx)),
    );

    apply(
        &mut r,
        json!([["mode_info_set", [true, [
            { "name": "insert", "cursor_shape": "vertical", "hl_id": 0x445566 }
        ]]]]),
    );
    r.drain_resolutions(&rx);
    apply(&mut r, json!([["mode_change", ["insert", 1]]]));
    assert_eq!(r.cursor_color(), RgbColor::new(0x44, 0x55, 0x66));
}

#[test]
fn test_unresolved_mode_renders_default_cursor_color() {
    let mut r = renderer(80, 24);
    apply(
        &mut r,
        json!([
            ["mode_info_set", [true, [
                { "name": "normal", "cursor_shape": "block", "hl_id": 51 }
            ]]],
            ["mode_change", ["normal", 0]]
        ]),
    );
    // The mode registered but NullResolver never completes, so the cursor
    // color stays at the default foreground.
    let normal = r.modes().get("normal").unwrap();
    assert!(normal.color.is_none());
    assert_eq!(r.cursor_color(), r.state().colors.foreground);
}

#[test]
fn test_late_resolution_does_not_disturb_batches() {
    let (tx, rx) = mpsc::channel();
    let dims = Dimensions::new(80, 24);
    let mut r = Renderer::new(
        dims,
        RecordingSurface::new(dims),
        Box::new(ChannelResolver::new(|_| Some(0x112233), tx)),
    );

    apply(
        &mut r,
        json!([["mode_info_set", [true, [
            { "name": "visual", "cursor_shape": "block", "hl_id": 70 }
        ]]]]),
    );
    // Several batches process before the completion is drained
    for _ in 0..3 {
        apply(&mut r, json!([["put", ["z"]]]));
    }
    assert!(r.modes().get("visual").unwrap().color.is_none());
    r.drain_resolutions(&rx);
    assert_eq!(
        r.modes().get("visual").unwrap().color,
        Some(RgbColor::new(0x11, 0x22, 0x33))
    );
}

#[test]
fn test_direct_resolution_message_is_last_writer_wins() {
    let mut r = renderer(80, 24);
    r.apply_resolution(ColorResolution {
        mode_name: "normal".to_string(),
        background: Some(0x010101),
    });
    r.apply_resolution(ColorResolution {
        mode_name: "normal".to_string(),
        background: Some(0x020202),
    });
    assert_eq!(
        r.modes().get("normal").unwrap().color,
        Some(RgbColor::new(2, 2, 2))
    );
}

#[test]
fn test_event_order_within_batch_is_preserved() {
    let mut r = renderer(80, 24);
    apply(
        &mut r,
        json!([
            ["highlight_set", [{ "background": 0x000000 }]],
            ["put", ["q"]],
            ["highlight_set", [{ "background": 0xffffff }]],
            ["put", ["w"]]
        ]),
    );
    assert_eq!(r.surface().texel(0, 0).unwrap().bg, Some(RgbColor::new(0, 0, 0)));
    assert_eq!(
        r.surface().texel(1, 0).unwrap().bg,
        Some(RgbColor::new(0xff, 0xff, 0xff))
    );
}

#[test]
fn test_decoded_events_match_wire_shapes() {
    let batch = json!([
        ["cursor_goto", [3, 7]],
        ["scroll", [-1]],
        ["eol_clear", []]
    ]);
    let events = decode_batch(&batch).unwrap();
    assert_eq!(
        events,
        vec![
            RedrawEvent::CursorGoto { row: 3, col: 7 },
            RedrawEvent::Scroll(-1),
            RedrawEvent::EolClear,
        ]
    );
}

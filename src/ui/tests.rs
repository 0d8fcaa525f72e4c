use super::gallery::BUILTIN_GALLERY;
use super::state::{PointerState, ResizeEdges, TemplateApp};
use crate::blocks::BlockKind;
use crate::constants;
use eframe::egui;

/// Drives one headless egui frame over the canvas with the given input events.
fn run_canvas_frame(ctx: &egui::Context, app: &mut TemplateApp, events: Vec<egui::Event>) {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    raw.events = events;
    let _ = ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });
}

/// Pins the page rect so the screen→canvas ratio is exactly 2.0 without
/// running a layout pass.
fn pin_page_rect_ratio_two(app: &mut TemplateApp) {
    app.canvas.page_rect = egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(constants::PAGE_WIDTH / 2.0, constants::PAGE_HEIGHT / 2.0),
    );
    assert_eq!(app.page_ratio(), 2.0);
}

#[test]
fn tap_selects_block_and_second_tap_deselects() {
    let mut app = TemplateApp::default();
    let id = app.template.add_block(BlockKind::Text);

    let ctx = egui::Context::default();
    // First frame establishes the page rect so positions can be computed.
    run_canvas_frame(&ctx, &mut app, vec![]);

    let block = app.template.blocks[&id].clone();
    let center = app.page_to_screen(egui::pos2(
        block.x + block.width / 2.0,
        block.y + block.height / 2.0,
    ));

    let press = egui::Event::PointerButton {
        pos: center,
        button: egui::PointerButton::Primary,
        pressed: true,
        modifiers: egui::Modifiers::NONE,
    };
    let release = egui::Event::PointerButton {
        pos: center,
        button: egui::PointerButton::Primary,
        pressed: false,
        modifiers: egui::Modifiers::NONE,
    };

    run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(center)]);
    run_canvas_frame(&ctx, &mut app, vec![press.clone()]);
    run_canvas_frame(&ctx, &mut app, vec![release.clone()]);
    assert_eq!(app.interaction.selected_block, Some(id));

    // Tapping the same block again toggles the selection off.
    run_canvas_frame(&ctx, &mut app, vec![press]);
    run_canvas_frame(&ctx, &mut app, vec![release]);
    assert_eq!(app.interaction.selected_block, None);
}

#[test]
fn tap_on_empty_page_clears_selection() {
    let mut app = TemplateApp::default();
    let id = app.template.add_block(BlockKind::Grid);
    app.interaction.selected_block = Some(id);

    let ctx = egui::Context::default();
    run_canvas_frame(&ctx, &mut app, vec![]);

    // Bottom-right corner of the page is outside every default block.
    let empty = app.page_to_screen(egui::pos2(
        constants::PAGE_WIDTH - 10.0,
        constants::PAGE_HEIGHT - 10.0,
    ));
    run_canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(empty)]);
    run_canvas_frame(
        &ctx,
        &mut app,
        vec![egui::Event::PointerButton {
            pos: empty,
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers: egui::Modifiers::NONE,
        }],
    );
    run_canvas_frame(
        &ctx,
        &mut app,
        vec![egui::Event::PointerButton {
            pos: empty,
            button: egui::PointerButton::Primary,
            pressed: false,
            modifiers: egui::Modifiers::NONE,
        }],
    );

    assert_eq!(app.interaction.selected_block, None);
}

#[test]
fn drag_moves_block_by_ratio_scaled_snapped_delta() {
    let mut app = TemplateApp::default();
    let id = app.template.add_block(BlockKind::Text);
    pin_page_rect_ratio_two(&mut app);

    let start = app.template.blocks[&id].clone();
    assert_eq!((start.x, start.y), (78.0, 78.0));

    app.interaction.pointer = PointerState::Dragging {
        id,
        raw: (start.x, start.y),
    };
    // 30 px right, 10 px down at ratio 2.0 → +60/+20 canvas units, then
    // snapped to the nearest 39-unit cell.
    app.apply_drag(egui::vec2(30.0, 10.0));

    let moved = &app.template.blocks[&id];
    assert_eq!(moved.x, 156.0); // snap(78 + 60)
    assert_eq!(moved.y, 117.0); // snap(78 + 20)
    assert_eq!(moved.width, start.width);
    assert_eq!(moved.height, start.height);
}

#[test]
fn drag_accumulates_subcell_deltas() {
    let mut app = TemplateApp::default();
    let id = app.template.add_block(BlockKind::Text);
    pin_page_rect_ratio_two(&mut app);

    let start = app.template.blocks[&id].clone();
    app.interaction.pointer = PointerState::Dragging {
        id,
        raw: (start.x, start.y),
    };

    // Each tick is below half a cell (9·2 = 18 units), but they add up.
    for _ in 0..4 {
        app.apply_drag(egui::vec2(9.0, 0.0));
    }

    // 4 ticks · 18 units = 72 units → snap(78 + 72) = 156.
    assert_eq!(app.template.blocks[&id].x, 156.0);
}

#[test]
fn drag_clamps_to_restriction_rect() {
    let mut app = TemplateApp::default();
    let id = app.template.add_block(BlockKind::Dots);
    pin_page_rect_ratio_two(&mut app);

    let start = app.template.blocks[&id].clone();
    app.interaction.pointer = PointerState::Dragging {
        id,
        raw: (start.x, start.y),
    };
    app.apply_drag(egui::vec2(-10_000.0, -10_000.0));

    let grid = app.template.grid;
    let block = &app.template.blocks[&id];
    assert_eq!(block.x, grid.restriction.x);
    assert_eq!(block.y, grid.restriction.y);
}

#[test]
fn resize_enforces_minimum_block_size() {
    let mut app = TemplateApp::default();
    let id = app.template.add_block(BlockKind::Ruled);
    pin_page_rect_ratio_two(&mut app);

    let start = app.template.blocks[&id].clone();
    app.interaction.pointer = PointerState::Resizing {
        id,
        edges: ResizeEdges {
            right: true,
            bottom: true,
            ..Default::default()
        },
        raw: (start.x, start.y, start.width, start.height),
    };
    app.apply_resize(egui::vec2(-10_000.0, -10_000.0));

    let min = app.template.grid.min_block_size();
    let block = &app.template.blocks[&id];
    assert_eq!(block.width, min);
    assert_eq!(block.height, min);
    // The anchored edges did not move.
    assert_eq!((block.x, block.y), (start.x, start.y));
}

#[test]
fn resize_from_left_edge_keeps_right_edge_fixed() {
    let mut app = TemplateApp::default();
    let id = app.template.add_block(BlockKind::Grid);
    pin_page_rect_ratio_two(&mut app);

    let start = app.template.blocks[&id].clone();
    let right_edge = start.x + start.width;
    app.interaction.pointer = PointerState::Resizing {
        id,
        edges: ResizeEdges {
            left: true,
            ..Default::default()
        },
        raw: (start.x, start.y, start.width, start.height),
    };
    // 39 canvas units left at ratio 2.0 is 19.5 screen px.
    app.apply_resize(egui::vec2(-19.5, 0.0));

    let block = &app.template.blocks[&id];
    assert_eq!(block.x, start.x - 39.0);
    assert_eq!(block.x + block.width, right_edge);
}

#[test]
fn rejected_load_keeps_current_state() {
    let mut app = TemplateApp::default();
    app.template.add_block(BlockKind::Text);
    app.template.add_block(BlockKind::Ruled);
    let before = app.template.clone();

    app.file
        .sender
        .send(super::state::FileOperationResult::LoadCompleted(
            "broken.json".into(),
            "{\"grid\": {}}".into(),
        ))
        .expect("send");

    let ctx = egui::Context::default();
    app.handle_pending_operations(&ctx);

    assert_eq!(app.template, before);
}

#[test]
fn gallery_load_replaces_state_atomically() {
    let mut app = TemplateApp::default();
    let stale = app.template.add_block(BlockKind::Dots);
    app.interaction.selected_block = Some(stale);

    let (_, json) = BUILTIN_GALLERY[0];
    app.file
        .sender
        .send(super::state::FileOperationResult::LoadCompleted(
            "gallery/daily-planner".into(),
            json.to_string(),
        ))
        .expect("send");

    let ctx = egui::Context::default();
    app.handle_pending_operations(&ctx);

    assert_eq!(app.template.blocks.len(), 3);
    assert!(!app.template.blocks.contains_key(&stale));
    // Selection never survives a template replacement.
    assert_eq!(app.interaction.selected_block, None);
    assert_eq!(app.template.global_options.number("border_width"), Some(2.0));
}

#[test]
fn deleting_last_block_enters_no_block_panel_mode() {
    let mut app = TemplateApp::default();
    let id = app.template.add_block(BlockKind::Checklist);
    app.interaction.selected_block = Some(id);

    app.delete_selected_block();

    assert!(app.template.blocks.is_empty());
    assert_eq!(app.interaction.selected_block, None);
    // With the page empty the global set has been swept too.
    assert!(app.template.global_options.is_empty());
}

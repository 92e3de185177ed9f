#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::IconRef;
use crate::input_list::UNKNOWN_SOURCE;

// =============================================================
// Helpers
// =============================================================

const KICK_PAYLOAD: &str = r#"{"label":"Kick Drum","icon":"🥁","category":"drums","isCustom":false}"#;

/// Canvas offset from the client origin so conversions are not trivially identity.
fn core() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_bounds(CanvasBounds::new(100.0, 50.0, 800.0, 600.0));
    core
}

/// Client point for a canvas percentage under `core()` bounds.
fn at_pct(x: f64, y: f64) -> Point {
    Point::new(100.0 + x * 8.0, 50.0 + y * 6.0)
}

fn place(core: &mut EngineCore, x: f64, y: f64) -> ItemId {
    let actions = core.on_drop(KICK_PAYLOAD, at_pct(x, y));
    match actions.first() {
        Some(Action::ItemCreated(item)) => item.id,
        other => panic!("expected ItemCreated, got {other:?}"),
    }
}

fn select(core: &mut EngineCore, id: ItemId) {
    let client = item_center(core.item(&id).expect("item"), &core.bounds);
    core.on_pointer_down(client, Button::Primary, 0.0);
    core.on_pointer_up(client);
}

fn open_menu(core: &mut EngineCore, id: ItemId) {
    let client = item_center(core.item(&id).expect("item"), &core.bounds);
    core.on_pointer_down(client, Button::Primary, 1_000.0);
    core.on_pointer_up(client);
    core.on_pointer_down(client, Button::Primary, 1_100.0);
    core.on_pointer_up(client);
    assert_eq!(core.state, InteractionState::ActionMenuOpen { id });
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_item_updated(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::ItemUpdated(_)))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn core_new_is_idle_and_empty() {
    let core = EngineCore::new();
    assert!(core.state.is_idle());
    assert!(core.items().is_empty());
    assert_eq!(core.zoom.percent(), 100);
    assert_eq!(core.doc.stage_size(), StageSize::default());
}

// =============================================================
// Drop
// =============================================================

#[test]
fn drop_kick_drum_places_item_and_derives_input() {
    let mut core = core();
    let actions = core.on_drop(KICK_PAYLOAD, at_pct(25.0, 50.0));
    assert!(has_action(&actions, |a| matches!(a, Action::ItemCreated(_))));

    let item = &core.items()[0];
    assert!(approx(item.position.x, 25.0));
    assert!(approx(item.position.y, 50.0));
    assert_eq!(item.position.rotation, 0.0);
    assert_eq!(item.scale, 1.0);
    assert!(!item.show_label);
    assert_eq!(item.kind, "kick");
    assert_eq!(item.label, "Kick Drum");
    assert_eq!(item.icon, IconRef::Glyph("🥁".into()));

    let inputs = core.input_list();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].channel_number, 1);
    assert_eq!(inputs[0].instrument_label, "Kick Drum");
    assert_eq!(inputs[0].suggested_source, "AKG D112");
    assert!(!inputs[0].phantom_power_required);
}

#[test]
fn drop_does_not_select() {
    let mut core = core();
    place(&mut core, 50.0, 50.0);
    assert!(core.selection().is_none());
}

#[test]
fn drop_outside_canvas_is_clamped() {
    let mut core = core();
    core.on_drop(KICK_PAYLOAD, Point::new(-400.0, 5_000.0));
    let item = &core.items()[0];
    assert_eq!(item.position.x, 0.0);
    assert_eq!(item.position.y, 100.0);
}

#[test]
fn drop_malformed_payload_is_ignored() {
    let mut core = core();
    assert!(core.on_drop("not json", at_pct(10.0, 10.0)).is_empty());
    assert!(core.on_drop("", at_pct(10.0, 10.0)).is_empty());
    assert!(core.on_drop(r#"{"label":"   "}"#, at_pct(10.0, 10.0)).is_empty());
    assert!(core.items().is_empty());
}

#[test]
fn drop_unknown_label_uses_slug_and_tbd() {
    let mut core = core();
    core.on_drop(r#"{"label":"Theremin","icon":"👻","category":"misc"}"#, at_pct(10.0, 10.0));
    assert_eq!(core.items()[0].kind, "theremin");
    assert_eq!(core.input_list()[0].suggested_source, UNKNOWN_SOURCE);
}

#[test]
fn drop_custom_icon_keeps_custom_ref() {
    let mut core = core();
    core.on_drop(r#"{"id":"icon-1","label":"Talkbox","icon":"icon-1","category":"custom","isCustom":true}"#, at_pct(10.0, 10.0));
    let item = &core.items()[0];
    assert_eq!(item.kind, "icon-1");
    assert_eq!(item.icon, IconRef::Custom("icon-1".into()));
}

#[test]
fn drops_stack_in_order() {
    let mut core = core();
    let a = place(&mut core, 10.0, 10.0);
    let b = place(&mut core, 10.0, 10.0);
    assert_eq!(core.items()[0].id, a);
    assert_eq!(core.items()[1].id, b);
    // topmost wins the hit test
    core.on_pointer_down(at_pct(10.0, 10.0), Button::Primary, 0.0);
    assert_eq!(core.selection(), Some(b));
}

// =============================================================
// Selection
// =============================================================

#[test]
fn pointer_down_on_item_selects() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    let actions = core.on_pointer_down(at_pct(50.0, 50.0), Button::Primary, 0.0);
    assert!(actions.contains(&Action::SelectionChanged(Some(id))));
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn pointer_down_on_background_clears_selection() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    select(&mut core, id);
    let actions = core.on_pointer_down(at_pct(5.0, 5.0), Button::Primary, 500.0);
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(core.state.is_idle());
}

#[test]
fn pointer_down_on_background_when_idle_is_silent() {
    let mut core = core();
    assert!(core.on_pointer_down(at_pct(5.0, 5.0), Button::Primary, 0.0).is_empty());
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = core();
    place(&mut core, 50.0, 50.0);
    assert!(core.on_pointer_down(at_pct(50.0, 50.0), Button::Secondary, 0.0).is_empty());
    assert!(core.state.is_idle());
}

// =============================================================
// Action menu
// =============================================================

#[test]
fn double_click_opens_action_menu() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    core.on_pointer_down(at_pct(50.0, 50.0), Button::Primary, 0.0);
    core.on_pointer_up(at_pct(50.0, 50.0));
    let actions = core.on_pointer_down(at_pct(50.0, 50.0), Button::Primary, 250.0);
    assert!(actions.contains(&Action::ActionMenuOpened { id }));
    assert_eq!(core.state, InteractionState::ActionMenuOpen { id });
}

#[test]
fn slow_second_click_only_rearms() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    core.on_pointer_down(at_pct(50.0, 50.0), Button::Primary, 0.0);
    core.on_pointer_up(at_pct(50.0, 50.0));
    core.on_pointer_down(at_pct(50.0, 50.0), Button::Primary, 301.0);
    assert!(matches!(core.state, InteractionState::Selected { id: s, armed_at_ms: Some(t), .. } if s == id && t == 301.0));
}

#[test]
fn click_on_other_item_does_not_open_menu() {
    let mut core = core();
    place(&mut core, 20.0, 20.0);
    let b = place(&mut core, 80.0, 80.0);
    core.on_pointer_down(at_pct(20.0, 20.0), Button::Primary, 0.0);
    core.on_pointer_up(at_pct(20.0, 20.0));
    core.on_pointer_down(at_pct(80.0, 80.0), Button::Primary, 100.0);
    assert_eq!(core.selection(), Some(b));
    assert!(matches!(core.state, InteractionState::Selected { .. }));
}

#[test]
fn menu_close_and_escape_return_to_selected() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    open_menu(&mut core, id);
    core.choose_menu_action(MenuAction::Close);
    assert_eq!(core.state, InteractionState::selected(id));

    open_menu(&mut core, id);
    core.on_key_down(&Key::new("Escape"));
    assert_eq!(core.state, InteractionState::selected(id));
}

#[test]
fn menu_action_without_open_menu_is_ignored() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    select(&mut core, id);
    assert!(core.choose_menu_action(MenuAction::Delete).is_empty());
    assert_eq!(core.items().len(), 1);
}

#[test]
fn menu_enlarge_and_shrink_step_scale() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    open_menu(&mut core, id);
    let actions = core.choose_menu_action(MenuAction::Enlarge);
    assert!(has_item_updated(&actions));
    assert!(approx(core.item(&id).expect("item").scale, 1.1));

    open_menu(&mut core, id);
    core.choose_menu_action(MenuAction::Shrink);
    open_menu(&mut core, id);
    core.choose_menu_action(MenuAction::Shrink);
    assert!(approx(core.item(&id).expect("item").scale, 0.9));
}

#[test]
fn menu_rotate_accumulates_clockwise() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    for expected in [90.0, 180.0, 270.0, 360.0] {
        open_menu(&mut core, id);
        core.choose_menu_action(MenuAction::Rotate);
        assert_eq!(core.item(&id).expect("item").position.rotation, expected);
    }
}

#[test]
fn menu_hide_label() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    core.set_label(&id, "Kick In");
    assert!(core.item(&id).expect("item").show_label);
    open_menu(&mut core, id);
    core.choose_menu_action(MenuAction::HideLabel);
    let item = core.item(&id).expect("item");
    assert!(!item.show_label);
    assert_eq!(item.label, "Kick In");
}

#[test]
fn menu_delete_removes_and_clears_selection() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    open_menu(&mut core, id);
    let actions = core.choose_menu_action(MenuAction::Delete);
    assert!(actions.contains(&Action::ItemDeleted { id }));
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(core.items().is_empty());
    assert!(core.state.is_idle());
}

#[test]
fn menu_duplicate_offsets_and_selects_clone() {
    let mut core = core();
    let id = place(&mut core, 40.0, 60.0);
    core.resize(&id, 0.5);
    open_menu(&mut core, id);
    let actions = core.choose_menu_action(MenuAction::Duplicate);

    assert_eq!(core.items().len(), 2);
    let clone = core.items()[1].clone();
    assert_ne!(clone.id, id);
    assert!(approx(clone.position.x, 45.0));
    assert!(approx(clone.position.y, 65.0));
    assert!(approx(clone.scale, 1.5));
    assert_eq!(clone.label, "Kick Drum");
    assert_eq!(core.selection(), Some(clone.id));
    assert!(actions.contains(&Action::ItemCreated(clone)));
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn small_move_does_not_start_drag() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    let start = at_pct(50.0, 50.0);
    core.on_pointer_down(start, Button::Primary, 0.0);
    assert!(core.on_pointer_move(Point::new(start.x + 2.0, start.y)).is_empty());
    assert!(matches!(core.state, InteractionState::Selected { .. }));
    assert_eq!(core.item(&id).expect("item").position.x, 50.0);
}

#[test]
fn drag_moves_item_and_keeps_grab_offset() {
    let mut core = core();
    let id = place(&mut core, 25.0, 50.0);
    // grab 10px right of center
    let grab = Point::new(at_pct(25.0, 50.0).x + 10.0, at_pct(25.0, 50.0).y);
    core.on_pointer_down(grab, Button::Primary, 0.0);
    let actions = core.on_pointer_move(Point::new(grab.x + 40.0, grab.y));
    assert!(actions.contains(&Action::SetCursor("grabbing".into())));
    assert!(has_item_updated(&actions));
    assert_eq!(core.state, InteractionState::Dragging { id, offset: Point::new(10.0, 0.0) });

    let item = core.item(&id).expect("item");
    assert!(approx(item.position.x, 30.0));
    assert!(approx(item.position.y, 50.0));
}

#[test]
fn pointer_up_ends_drag_in_selected() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    core.on_pointer_down(at_pct(50.0, 50.0), Button::Primary, 0.0);
    core.on_pointer_move(at_pct(60.0, 50.0));
    let actions = core.on_pointer_up(at_pct(70.0, 40.0));
    assert!(has_item_updated(&actions));
    assert_eq!(core.state, InteractionState::selected(id));
    let item = core.item(&id).expect("item");
    assert!(approx(item.position.x, 70.0));
    assert!(approx(item.position.y, 40.0));
}

#[test]
fn drag_past_edge_is_clamped() {
    let mut core = core();
    let id = place(&mut core, 90.0, 90.0);
    core.on_pointer_down(at_pct(90.0, 90.0), Button::Primary, 0.0);
    core.on_pointer_move(Point::new(5_000.0, 5_000.0));
    core.on_pointer_up(Point::new(5_000.0, 5_000.0));
    let item = core.item(&id).expect("item");
    assert_eq!(item.position.x, 100.0);
    assert_eq!(item.position.y, 100.0);
}

#[test]
fn pointer_leave_ends_drag() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    core.on_pointer_down(at_pct(50.0, 50.0), Button::Primary, 0.0);
    core.on_pointer_move(at_pct(55.0, 50.0));
    core.on_pointer_leave(at_pct(-10.0, 50.0));
    assert_eq!(core.state, InteractionState::selected(id));
    assert_eq!(core.item(&id).expect("item").position.x, 0.0);
}

#[test]
fn drag_does_not_arm_double_click() {
    let mut core = core();
    place(&mut core, 50.0, 50.0);
    core.on_pointer_down(at_pct(50.0, 50.0), Button::Primary, 0.0);
    core.on_pointer_move(at_pct(60.0, 50.0));
    core.on_pointer_up(at_pct(60.0, 50.0));
    core.on_pointer_down(at_pct(60.0, 50.0), Button::Primary, 100.0);
    assert!(matches!(core.state, InteractionState::Selected { .. }));
}

#[test]
fn move_without_press_is_ignored() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    select(&mut core, id);
    assert!(core.on_pointer_move(at_pct(80.0, 80.0)).is_empty());
    assert!(core.move_selected(at_pct(80.0, 80.0)).is_none());
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn delete_key_removes_selected() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    select(&mut core, id);
    let actions = core.on_key_down(&Key::new("Delete"));
    assert!(actions.contains(&Action::ItemDeleted { id }));
    assert!(core.items().is_empty());
    assert!(core.state.is_idle());
}

#[test]
fn delete_key_when_idle_is_noop() {
    let mut core = core();
    place(&mut core, 50.0, 50.0);
    assert!(core.on_key_down(&Key::new("Delete")).is_empty());
    assert_eq!(core.items().len(), 1);
}

#[test]
fn other_keys_are_ignored() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    select(&mut core, id);
    assert!(core.on_key_down(&Key::new("Backspace")).is_empty());
    assert_eq!(core.items().len(), 1);
}

// =============================================================
// Label editing
// =============================================================

#[test]
fn edit_label_commit_sets_text_and_shows_label() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    open_menu(&mut core, id);
    let actions = core.choose_menu_action(MenuAction::EditLabel);
    assert!(actions.contains(&Action::LabelEditRequested { id, draft: "Kick Drum".into() }));

    core.set_label_draft("  Kick In  ");
    let actions = core.on_key_down(&Key::new("Enter"));
    assert!(has_item_updated(&actions));
    let item = core.item(&id).expect("item");
    assert_eq!(item.label, "Kick In");
    assert!(item.show_label);
    assert_eq!(core.state, InteractionState::selected(id));
}

#[test]
fn blank_label_keeps_text_but_shows_it() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    open_menu(&mut core, id);
    core.choose_menu_action(MenuAction::EditLabel);
    core.set_label_draft("   ");
    core.commit_label();
    let item = core.item(&id).expect("item");
    assert_eq!(item.label, "Kick Drum");
    assert!(item.show_label);
}

#[test]
fn escape_cancels_label_edit() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    open_menu(&mut core, id);
    core.choose_menu_action(MenuAction::EditLabel);
    core.set_label_draft("Something else");
    let actions = core.on_key_down(&Key::new("Escape"));
    assert!(!has_item_updated(&actions));
    let item = core.item(&id).expect("item");
    assert_eq!(item.label, "Kick Drum");
    assert!(!item.show_label);
    assert_eq!(core.state, InteractionState::selected(id));
}

#[test]
fn background_click_commits_label_edit() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    open_menu(&mut core, id);
    core.choose_menu_action(MenuAction::EditLabel);
    core.set_label_draft("Kick Out");
    let actions = core.on_pointer_down(at_pct(5.0, 5.0), Button::Primary, 2_000.0);
    assert!(has_item_updated(&actions));
    assert_eq!(core.item(&id).expect("item").label, "Kick Out");
    assert!(core.state.is_idle());
}

#[test]
fn commit_without_edit_is_noop() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    select(&mut core, id);
    assert!(core.commit_label().is_empty());
    assert_eq!(core.state, InteractionState::selected(id));
}

#[test]
fn draft_outside_edit_is_ignored() {
    let mut core = core();
    core.set_label_draft("nobody listens");
    assert!(core.state.is_idle());
}

// =============================================================
// Item operations
// =============================================================

#[test]
fn resize_clamps_and_reports_no_change_at_bounds() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    assert!(core.resize(&id, 10.0).is_some());
    assert_eq!(core.item(&id).expect("item").scale, 3.0);
    assert!(core.resize(&id, 0.1).is_none());
    assert!(core.resize(&id, -10.0).is_some());
    assert_eq!(core.item(&id).expect("item").scale, 0.3);
    assert!(core.resize(&id, -0.1).is_none());
}

#[test]
fn resize_unknown_item_is_none() {
    let mut core = core();
    assert!(core.resize(&uuid::Uuid::new_v4(), 0.1).is_none());
}

#[test]
fn duplicate_near_edge_is_clamped() {
    let mut core = core();
    let id = place(&mut core, 98.0, 97.0);
    core.duplicate(&id);
    let clone = &core.items()[1];
    assert_eq!(clone.position.x, 100.0);
    assert_eq!(clone.position.y, 100.0);
}

#[test]
fn duplicate_unknown_item_is_noop() {
    let mut core = core();
    assert!(core.duplicate(&uuid::Uuid::new_v4()).is_empty());
    assert!(core.items().is_empty());
}

#[test]
fn remove_other_item_preserves_selection() {
    let mut core = core();
    let a = place(&mut core, 20.0, 20.0);
    let b = place(&mut core, 80.0, 80.0);
    select(&mut core, a);
    let actions = core.remove(&b);
    assert!(!actions.contains(&Action::SelectionChanged(None)));
    assert_eq!(core.selection(), Some(a));
}

#[test]
fn remove_unknown_item_is_noop() {
    let mut core = core();
    place(&mut core, 20.0, 20.0);
    assert!(core.remove(&uuid::Uuid::new_v4()).is_empty());
    assert_eq!(core.items().len(), 1);
}

#[test]
fn set_label_unknown_item_is_none() {
    let mut core = core();
    assert!(core.set_label(&uuid::Uuid::new_v4(), "x").is_none());
}

// =============================================================
// Stage, zoom and document
// =============================================================

#[test]
fn set_stage_size_reports_resize() {
    let mut core = core();
    let size = StageSize::new(16.0, 10.0).expect("size");
    let action = core.set_stage_size(size);
    assert_eq!(action, Action::StageResized(size));
    assert!(action.mutates_document());
    assert_eq!(core.doc.stage_size(), size);
}

#[test]
fn stage_size_does_not_move_items() {
    let mut core = core();
    let id = place(&mut core, 25.0, 50.0);
    core.set_stage_size(StageSize::new(4.0, 3.0).expect("size"));
    let item = core.item(&id).expect("item");
    assert!(approx(item.position.x, 25.0));
    assert!(approx(item.position.y, 50.0));
}

#[test]
fn zoom_steps_and_clamps() {
    let mut core = core();
    assert_eq!(core.zoom_in().percent(), 110);
    for _ in 0..20 {
        core.zoom_in();
    }
    assert_eq!(core.zoom.percent(), 200);
    for _ in 0..20 {
        core.zoom_out();
    }
    assert_eq!(core.zoom.percent(), 50);
    assert_eq!(core.reset_zoom().percent(), 100);
}

#[test]
fn zoomed_bounds_keep_percent_positions() {
    let mut core = EngineCore::new();
    core.set_bounds(CanvasBounds::new(0.0, 0.0, 1_600.0, 1_200.0));
    core.on_drop(KICK_PAYLOAD, Point::new(400.0, 600.0));
    let item = &core.items()[0];
    assert!(approx(item.position.x, 25.0));
    assert!(approx(item.position.y, 50.0));
}

#[test]
fn load_document_resets_interaction() {
    let mut core = core();
    let id = place(&mut core, 50.0, 50.0);
    select(&mut core, id);
    core.load_document(StageDocument::new());
    assert!(core.state.is_idle());
    assert!(core.items().is_empty());
}

#[test]
fn mutates_document_classification() {
    let id = uuid::Uuid::new_v4();
    assert!(Action::ItemDeleted { id }.mutates_document());
    assert!(!Action::SelectionChanged(Some(id)).mutates_document());
    assert!(!Action::ActionMenuOpened { id }.mutates_document());
    assert!(!Action::RenderNeeded.mutates_document());
    assert!(!Action::SetCursor("default".into()).mutates_document());
}

//! Canvas interaction controller.
//!
//! `EngineCore` is the only mutator of item placement and appearance. It
//! turns pointer, keyboard and menu events into document mutations and
//! reports them as [`Action`]s for the host to render and persist. `Engine`
//! wraps it with the browser element whose bounding box defines the canvas.

use web_sys::HtmlElement;

use crate::consts::{DOUBLE_CLICK_WINDOW_MS, DRAG_THRESHOLD_PX, DUPLICATE_OFFSET, RESIZE_STEP, ROTATE_STEP_DEG};
use crate::doc::{ItemId, ItemPosition, StageDocument, StageItem, StageSize, clamp_scale};
use crate::hit::{hit_test, item_center};
use crate::input::{Button, InteractionState, Key, MenuAction, Press};
use crate::input_list::{InputChannel, derive};
use crate::payload::DragPayload;
use crate::viewport::{CanvasBounds, Point, Zoom, clamp_percent};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ItemCreated(StageItem),
    ItemUpdated(StageItem),
    ItemDeleted { id: ItemId },
    StageResized(StageSize),
    SelectionChanged(Option<ItemId>),
    ActionMenuOpened { id: ItemId },
    LabelEditRequested { id: ItemId, draft: String },
    SetCursor(String),
    RenderNeeded,
}

impl Action {
    /// Whether this action changed the persisted document.
    #[must_use]
    pub fn mutates_document(&self) -> bool {
        matches!(
            self,
            Self::ItemCreated(_) | Self::ItemUpdated(_) | Self::ItemDeleted { .. } | Self::StageResized(_)
        )
    }
}

/// Core engine state: all logic that doesn't depend on the DOM.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: StageDocument,
    pub state: InteractionState,
    pub bounds: CanvasBounds,
    pub zoom: Zoom,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Hydrate from a persisted document. Clears any interaction in progress.
    pub fn load_document(&mut self, doc: StageDocument) {
        self.doc = doc;
        self.state = InteractionState::Idle;
    }

    /// Update the canvas element's client bounding box.
    pub fn set_bounds(&mut self, bounds: CanvasBounds) {
        self.bounds = bounds;
    }

    pub fn zoom_in(&mut self) -> Zoom {
        self.zoom = self.zoom.zoom_in();
        self.zoom
    }

    pub fn zoom_out(&mut self) -> Zoom {
        self.zoom = self.zoom.zoom_out();
        self.zoom
    }

    pub fn reset_zoom(&mut self) -> Zoom {
        self.zoom = Zoom::reset();
        self.zoom
    }

    pub fn set_stage_size(&mut self, size: StageSize) -> Action {
        self.doc.set_stage_size(size);
        Action::StageResized(size)
    }

    // --- Drop ---

    /// Handle a drop of a raw drag payload at a client position.
    ///
    /// A payload that does not parse is logged and ignored.
    pub fn on_drop(&mut self, raw: &str, client: Point) -> Vec<Action> {
        match DragPayload::parse(raw) {
            Ok(payload) => vec![self.place_item(&payload, client), Action::RenderNeeded],
            Err(e) => {
                log::warn!("ignoring drop: {e}");
                Vec::new()
            }
        }
    }

    /// Create a new item from a catalog payload at a client position.
    ///
    /// The new item is appended on top and is not selected.
    pub fn place_item(&mut self, payload: &DragPayload, client: Point) -> Action {
        let pct = self.bounds.client_to_percent(client);
        let item = StageItem::new(payload.kind(), payload.label.trim(), payload.icon_ref(), payload.category.clone(), pct.x, pct.y);
        log::debug!("placed {} at ({:.1}, {:.1})", item.kind, item.position.x, item.position.y);
        self.doc.append(item.clone());
        Action::ItemCreated(item)
    }

    // --- Pointer ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, now_ms: f64) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if matches!(self.state, InteractionState::EditingLabel { .. }) {
            actions.extend(self.commit_label());
        }

        let Some(id) = hit_test(client, &self.doc, &self.bounds) else {
            if !self.state.is_idle() {
                self.state = InteractionState::Idle;
                actions.push(Action::SelectionChanged(None));
                actions.push(Action::RenderNeeded);
            }
            return actions;
        };

        if self.is_second_click(id, now_ms) {
            self.state = InteractionState::ActionMenuOpen { id };
            actions.push(Action::ActionMenuOpened { id });
            actions.push(Action::RenderNeeded);
            return actions;
        }

        let previous = self.state.selected_id();
        let offset = match self.doc.get(&id) {
            Some(item) => client.sub(item_center(item, &self.bounds)),
            None => Point::new(0.0, 0.0),
        };
        self.state = InteractionState::Selected {
            id,
            armed_at_ms: Some(now_ms),
            press: Some(Press { origin: client, offset }),
        };
        if previous != Some(id) {
            actions.push(Action::SelectionChanged(Some(id)));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, client: Point) -> Vec<Action> {
        match self.state {
            InteractionState::Selected { id, press: Some(press), .. } => {
                let d = client.sub(press.origin);
                if d.x.hypot(d.y) < DRAG_THRESHOLD_PX {
                    return Vec::new();
                }
                self.state = InteractionState::Dragging { id, offset: press.offset };
                let mut actions = vec![Action::SetCursor("grabbing".into())];
                actions.extend(self.move_selected(client));
                actions
            }
            InteractionState::Dragging { .. } => self.move_selected(client).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self, client: Point) -> Vec<Action> {
        match self.state {
            InteractionState::Dragging { id, .. } => {
                let mut actions: Vec<Action> = self.move_selected(client).into_iter().collect();
                self.state = InteractionState::selected(id);
                actions.push(Action::SetCursor("default".into()));
                actions.push(Action::RenderNeeded);
                actions
            }
            InteractionState::Selected { id, armed_at_ms, press: Some(_) } => {
                self.state = InteractionState::Selected { id, armed_at_ms, press: None };
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Leaving the canvas ends a drag exactly as a pointer-up would.
    pub fn on_pointer_leave(&mut self, client: Point) -> Vec<Action> {
        self.on_pointer_up(client)
    }

    /// Move the dragged item so that its center sits at `client - offset`.
    /// No-op unless a drag is in progress.
    pub fn move_selected(&mut self, client: Point) -> Option<Action> {
        let InteractionState::Dragging { id, offset } = self.state else {
            return None;
        };
        let pct = self.bounds.client_to_percent(client.sub(offset));
        let item = self.doc.update(&id, |old| StageItem {
            position: ItemPosition { x: clamp_percent(pct.x), y: clamp_percent(pct.y), rotation: old.position.rotation },
            ..old.clone()
        })?;
        Some(Action::ItemUpdated(item.clone()))
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        match &self.state {
            &InteractionState::Selected { id, .. } | &InteractionState::ActionMenuOpen { id } if key.is_delete() => {
                self.remove(&id)
            }
            &InteractionState::ActionMenuOpen { id } if key.is_escape() => {
                self.state = InteractionState::selected(id);
                vec![Action::RenderNeeded]
            }
            InteractionState::EditingLabel { .. } if key.is_enter() => self.commit_label(),
            InteractionState::EditingLabel { .. } if key.is_escape() => self.cancel_label(),
            _ => Vec::new(),
        }
    }

    // --- Action menu ---

    /// Apply a menu choice. Ignored unless the menu is open.
    pub fn choose_menu_action(&mut self, choice: MenuAction) -> Vec<Action> {
        let InteractionState::ActionMenuOpen { id } = self.state else {
            return Vec::new();
        };
        match choice {
            MenuAction::EditLabel => {
                let draft = self.doc.get(&id).map(|item| item.label.clone()).unwrap_or_default();
                self.state = InteractionState::EditingLabel { id, draft: draft.clone() };
                vec![Action::LabelEditRequested { id, draft }]
            }
            MenuAction::Duplicate => self.duplicate(&id),
            MenuAction::Delete => self.remove(&id),
            MenuAction::HideLabel => {
                let change = self.hide_label(&id);
                self.back_to_selected(id, change)
            }
            MenuAction::Enlarge => {
                let change = self.resize(&id, RESIZE_STEP);
                self.back_to_selected(id, change)
            }
            MenuAction::Shrink => {
                let change = self.resize(&id, -RESIZE_STEP);
                self.back_to_selected(id, change)
            }
            MenuAction::Rotate => {
                let change = self.rotate(&id, ROTATE_STEP_DEG);
                self.back_to_selected(id, change)
            }
            MenuAction::Close => self.back_to_selected(id, None),
        }
    }

    fn back_to_selected(&mut self, id: ItemId, change: Option<Action>) -> Vec<Action> {
        self.state = InteractionState::selected(id);
        let mut actions: Vec<Action> = change.into_iter().collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Label editing ---

    /// Replace the label draft. Ignored unless a label is being edited.
    pub fn set_label_draft(&mut self, text: impl Into<String>) {
        if let InteractionState::EditingLabel { draft, .. } = &mut self.state {
            *draft = text.into();
        }
    }

    /// Commit the draft (blur or Enter).
    pub fn commit_label(&mut self) -> Vec<Action> {
        let InteractionState::EditingLabel { id, .. } = self.state else {
            return Vec::new();
        };
        let InteractionState::EditingLabel { draft, .. } = std::mem::replace(&mut self.state, InteractionState::selected(id)) else {
            return Vec::new();
        };
        let mut actions: Vec<Action> = self.set_label(&id, &draft).into_iter().collect();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Discard the draft (Escape). The item is left untouched.
    pub fn cancel_label(&mut self) -> Vec<Action> {
        let InteractionState::EditingLabel { id, .. } = self.state else {
            return Vec::new();
        };
        self.state = InteractionState::selected(id);
        vec![Action::RenderNeeded]
    }

    // --- Item operations ---

    /// Set the label text and reveal it. Blank text keeps the existing label.
    pub fn set_label(&mut self, id: &ItemId, text: &str) -> Option<Action> {
        let text = text.trim();
        let item = self.doc.update(id, |old| StageItem {
            label: if text.is_empty() { old.label.clone() } else { text.to_owned() },
            show_label: true,
            ..old.clone()
        })?;
        Some(Action::ItemUpdated(item.clone()))
    }

    pub fn hide_label(&mut self, id: &ItemId) -> Option<Action> {
        let item = self.doc.update(id, |old| StageItem { show_label: false, ..old.clone() })?;
        Some(Action::ItemUpdated(item.clone()))
    }

    /// Add `delta` to the scale, clamped to `[0.3, 3.0]`. Returns `None` when
    /// the item is unknown or the clamp leaves the scale unchanged.
    pub fn resize(&mut self, id: &ItemId, delta: f64) -> Option<Action> {
        let current = self.doc.get(id)?.scale;
        let next = clamp_scale(current + delta);
        if (next - current).abs() < f64::EPSILON {
            return None;
        }
        let item = self.doc.update(id, |old| StageItem { scale: next, ..old.clone() })?;
        Some(Action::ItemUpdated(item.clone()))
    }

    /// Add `degrees` clockwise. The stored rotation is not wrapped.
    pub fn rotate(&mut self, id: &ItemId, degrees: f64) -> Option<Action> {
        let item = self.doc.update(id, |old| StageItem {
            position: ItemPosition { rotation: old.position.rotation + degrees, ..old.position },
            ..old.clone()
        })?;
        Some(Action::ItemUpdated(item.clone()))
    }

    /// Clone an item with a new id, offset by 5 points on both axes, and
    /// select the clone.
    pub fn duplicate(&mut self, id: &ItemId) -> Vec<Action> {
        let Some(source) = self.doc.get(id) else {
            return Vec::new();
        };
        let mut clone = source.clone();
        clone.id = uuid::Uuid::new_v4();
        clone.position.x = clamp_percent(source.position.x + DUPLICATE_OFFSET);
        clone.position.y = clamp_percent(source.position.y + DUPLICATE_OFFSET);
        let clone_id = clone.id;
        self.doc.append(clone.clone());
        self.state = InteractionState::selected(clone_id);
        vec![Action::ItemCreated(clone), Action::SelectionChanged(Some(clone_id)), Action::RenderNeeded]
    }

    /// Delete an item. Clears the selection only if it pointed at this item.
    pub fn remove(&mut self, id: &ItemId) -> Vec<Action> {
        if self.doc.remove(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::ItemDeleted { id: *id }];
        if self.state.selected_id().as_ref() == Some(id) {
            self.state = InteractionState::Idle;
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    /// The currently selected item, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.state.selected_id()
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&StageItem> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn items(&self) -> &[StageItem] {
        self.doc.items()
    }

    /// Console input list for the current items.
    #[must_use]
    pub fn input_list(&self) -> Vec<InputChannel> {
        derive(self.doc.items())
    }

    fn is_second_click(&self, id: ItemId, now_ms: f64) -> bool {
        match self.state {
            InteractionState::Selected { id: selected, armed_at_ms: Some(first), .. } => {
                selected == id && now_ms >= first && now_ms - first <= DOUBLE_CLICK_WINDOW_MS
            }
            _ => false,
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the canvas host element.
pub struct Engine {
    element: HtmlElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(element: HtmlElement) -> Self {
        let mut engine = Self { element, core: EngineCore::new() };
        engine.refresh_bounds();
        engine
    }

    /// Re-read the element's bounding box. Called before every pointer event
    /// so scrolling, zoom and layout changes never skew the percentages.
    pub fn refresh_bounds(&mut self) {
        let rect = self.element.get_bounding_client_rect();
        self.core.set_bounds(CanvasBounds::new(rect.left(), rect.top(), rect.width(), rect.height()));
    }

    // --- Delegated input events ---

    pub fn on_drop(&mut self, raw: &str, client: Point) -> Vec<Action> {
        self.refresh_bounds();
        self.core.on_drop(raw, client)
    }

    pub fn on_pointer_down(&mut self, client: Point, button: Button, now_ms: f64) -> Vec<Action> {
        self.refresh_bounds();
        self.core.on_pointer_down(client, button, now_ms)
    }

    pub fn on_pointer_move(&mut self, client: Point) -> Vec<Action> {
        self.refresh_bounds();
        self.core.on_pointer_move(client)
    }

    pub fn on_pointer_up(&mut self, client: Point) -> Vec<Action> {
        self.refresh_bounds();
        self.core.on_pointer_up(client)
    }

    pub fn on_pointer_leave(&mut self, client: Point) -> Vec<Action> {
        self.refresh_bounds();
        self.core.on_pointer_leave(client)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    pub fn choose_menu_action(&mut self, choice: MenuAction) -> Vec<Action> {
        self.core.choose_menu_action(choice)
    }

    pub fn set_label_draft(&mut self, text: impl Into<String>) {
        self.core.set_label_draft(text);
    }

    pub fn commit_label(&mut self) -> Vec<Action> {
        self.core.commit_label()
    }

    pub fn cancel_label(&mut self) -> Vec<Action> {
        self.core.cancel_label()
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.core.selection()
    }

    #[must_use]
    pub fn input_list(&self) -> Vec<InputChannel> {
        self.core.input_list()
    }
}

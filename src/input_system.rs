use crate::input::{InputState, LogicalKey, MouseButtonKind};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;

/// Window-level actions that the game loop must handle itself
///
/// Gameplay input (movement keys, mouse buttons, pointer) never shows up
/// here: it is latched straight into `InputState` for entities to read on
/// the next tick. Only things the simulation cannot act on are returned.
#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    /// Window closed or Escape pressed
    Quit,
    /// `;` pressed
    ToggleFullscreen,
    /// New drawable size in pixels
    Resized(u32, u32),
}

/// InputSystem translates SDL2 events into input state and actions
///
/// # Architecture
///
/// Each event is handled in one of two ways:
/// 1. Keys bound to a `LogicalKey`, mouse buttons and pointer motion update
///    the shared `InputState` (held flags, edge flags, last pointer position)
/// 2. Quit, fullscreen toggle and window resize become `GameAction`s
///
/// # Rust Learning: Keeping SDL at the edge
///
/// Nothing past this module sees an SDL type. `InputState` is plain data, so
/// entities and tests can drive it without an SDL context.
pub struct InputSystem {
    /// Physical key to logical key table, searched in order
    bindings: Vec<(Keycode, LogicalKey)>,
}

impl InputSystem {
    /// Creates an InputSystem with the default A W S D Q E Space bindings
    pub fn new() -> Self {
        InputSystem {
            bindings: vec![
                (Keycode::A, LogicalKey::A),
                (Keycode::W, LogicalKey::W),
                (Keycode::S, LogicalKey::S),
                (Keycode::D, LogicalKey::D),
                (Keycode::Q, LogicalKey::Q),
                (Keycode::E, LogicalKey::E),
                (Keycode::Space, LogicalKey::Space),
            ],
        }
    }

    /// Binds `key` to `logical`, replacing any previous binding of `key`
    pub fn bind(&mut self, key: Keycode, logical: LogicalKey) {
        self.bindings.retain(|(k, _)| *k != key);
        self.bindings.push((key, logical));
    }

    /// Logical key bound to a physical key, if any
    pub fn logical_key(&self, key: Keycode) -> Option<LogicalKey> {
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, logical)| *logical)
    }

    /// Drains all pending SDL2 events into `input`
    ///
    /// Returns the window-level actions in the order they happened.
    pub fn poll_events(&self, event_pump: &mut EventPump, input: &mut InputState) -> Vec<GameAction> {
        event_pump
            .poll_iter()
            .filter_map(|event| self.handle_event(&event, input))
            .collect()
    }

    /// Applies one event to `input`, returning an action if it produces one
    pub fn handle_event(&self, event: &Event, input: &mut InputState) -> Option<GameAction> {
        match event {
            Event::Quit { .. } => Some(GameAction::Quit),
            Event::KeyDown {
                keycode: Some(key),
                repeat,
                ..
            } => self.handle_key(*key, true, *repeat, input),
            Event::KeyUp {
                keycode: Some(key), ..
            } => self.handle_key(*key, false, false, input),
            Event::MouseButtonDown { mouse_btn, x, y, .. } => {
                input.set_pointer(*x, *y);
                Self::handle_mouse_button(*mouse_btn, true, input);
                None
            }
            Event::MouseButtonUp { mouse_btn, x, y, .. } => {
                input.set_pointer(*x, *y);
                Self::handle_mouse_button(*mouse_btn, false, input);
                None
            }
            Event::MouseMotion { x, y, .. } => {
                input.set_pointer(*x, *y);
                None
            }
            Event::Window {
                win_event: WindowEvent::Resized(w, h) | WindowEvent::SizeChanged(w, h),
                ..
            } => Some(GameAction::Resized((*w).max(0) as u32, (*h).max(0) as u32)),
            _ => {
                // Ignore other event types
                None
            }
        }
    }

    /// Handle a key press or release
    ///
    /// Bound keys latch into `input`. Escape and `;` only act on a fresh
    /// press, never on auto-repeat or release.
    pub fn handle_key(&self, key: Keycode, down: bool, repeat: bool, input: &mut InputState) -> Option<GameAction> {
        if let Some(logical) = self.logical_key(key) {
            input.set_key(logical, down);
            return None;
        }
        if !down || repeat {
            return None;
        }
        match key {
            Keycode::Escape => Some(GameAction::Quit),
            Keycode::Semicolon => Some(GameAction::ToggleFullscreen),
            _ => {
                // Unbound keys are ignored
                None
            }
        }
    }

    fn handle_mouse_button(button: MouseButton, down: bool, input: &mut InputState) {
        match button {
            MouseButton::Left => input.set_mouse_button(MouseButtonKind::Left, down),
            MouseButton::Right => input.set_mouse_button(MouseButtonKind::Right, down),
            _ => {
                // Ignore other mouse buttons
            }
        }
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

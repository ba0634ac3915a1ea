/// Logical keys the game reacts to, independent of the physical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    A,
    W,
    S,
    D,
    Q,
    E,
    Space,
}

impl LogicalKey {
    pub const COUNT: usize = 7;

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonKind {
    Left,
    Right,
}

/// Latched keyboard and mouse state.
///
/// The input handler writes into this between ticks; entities only read it
/// during a tick. Held flags follow the device. Each button report rewrites
/// its edge flag to `down && !held`: a fresh press raises it, a release or a
/// repeated press lowers it. The scheduler also calls `clear_edges` at the
/// end of every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    keys: [bool; LogicalKey::COUNT],
    pub mouse_left: bool,
    pub mouse_right: bool,
    pub mouse_edge_left: bool,
    pub mouse_edge_right: bool,
    pub mouse_x: i32,
    pub mouse_y: i32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: LogicalKey, down: bool) {
        self.keys[key.index()] = down;
    }

    pub fn is_down(&self, key: LogicalKey) -> bool {
        self.keys[key.index()]
    }

    pub fn set_mouse_button(&mut self, button: MouseButtonKind, down: bool) {
        match button {
            MouseButtonKind::Left => {
                self.mouse_edge_left = down && !self.mouse_left;
                self.mouse_left = down;
            }
            MouseButtonKind::Right => {
                self.mouse_edge_right = down && !self.mouse_right;
                self.mouse_right = down;
            }
        }
    }

    /// Last pointer position wins.
    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    pub fn clear_edges(&mut self) {
        self.mouse_edge_left = false;
        self.mouse_edge_right = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_latch() {
        let mut input = InputState::new();
        input.set_key(LogicalKey::W, true);
        assert!(input.is_down(LogicalKey::W));
        assert!(!input.is_down(LogicalKey::S));

        input.set_key(LogicalKey::W, false);
        assert!(!input.is_down(LogicalKey::W));
    }

    #[test]
    fn test_press_sets_edge_once() {
        let mut input = InputState::new();
        input.set_mouse_button(MouseButtonKind::Left, true);
        assert!(input.mouse_left);
        assert!(input.mouse_edge_left);

        input.clear_edges();
        // Still held: a repeated down report is not a new edge
        input.set_mouse_button(MouseButtonKind::Left, true);
        assert!(!input.mouse_edge_left);
    }

    #[test]
    fn test_release_lowers_edge() {
        let mut input = InputState::new();
        input.set_mouse_button(MouseButtonKind::Right, true);
        assert!(input.mouse_edge_right);

        // Press and release inside one tick: nothing left to fire on
        input.set_mouse_button(MouseButtonKind::Right, false);
        assert!(!input.mouse_right);
        assert!(!input.mouse_edge_right);
    }

    #[test]
    fn test_repeated_press_lowers_edge() {
        let mut input = InputState::new();
        input.set_mouse_button(MouseButtonKind::Left, true);
        input.set_mouse_button(MouseButtonKind::Left, true);
        assert!(input.mouse_left);
        assert!(!input.mouse_edge_left);
    }

    #[test]
    fn test_buttons_are_independent() {
        let mut input = InputState::new();
        input.set_mouse_button(MouseButtonKind::Left, true);
        input.set_mouse_button(MouseButtonKind::Right, false);
        assert!(input.mouse_edge_left);
        assert!(!input.mouse_edge_right);
    }

    #[test]
    fn test_pointer_last_value_wins() {
        let mut input = InputState::new();
        input.set_pointer(10, 20);
        input.set_pointer(30, 40);
        assert_eq!((input.mouse_x, input.mouse_y), (30, 40));
    }
}

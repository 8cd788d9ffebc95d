use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use super::{Button, InputSource};

/// Edge tracker fed by backend press/release events.
///
/// Edges accumulate between frames and are cleared by `end_frame`. Terminals
/// that never report releases are handled by `expire`, which releases keys
/// that have not been re-seen (auto-repeat) within a timeout.
#[derive(Debug, Default)]
pub struct InputTracker {
    down: HashSet<Button>,
    pressed: HashSet<Button>,
    released: HashSet<Button>,
    last_seen: HashMap<Button, Instant>,
    cursor: (i32, i32),
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or an auto-repeat of an already held button.
    pub fn press(&mut self, button: Button, now: Instant) {
        if self.down.insert(button) {
            self.pressed.insert(button);
        }
        self.last_seen.insert(button, now);
    }

    pub fn release(&mut self, button: Button) {
        if self.down.remove(&button) {
            self.released.insert(button);
        }
        self.last_seen.remove(&button);
    }

    pub fn release_all(&mut self) {
        let held: Vec<Button> = self.down.iter().copied().collect();
        for button in held {
            self.release(button);
        }
    }

    pub fn move_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    /// Release keys not seen for longer than `timeout`. Mouse buttons always
    /// report releases and are left alone.
    pub fn expire(&mut self, now: Instant, timeout: Duration) {
        let stale: Vec<Button> = self
            .last_seen
            .iter()
            .filter(|(button, seen)| {
                matches!(button, Button::Key(_)) && now.duration_since(**seen) > timeout
            })
            .map(|(button, _)| *button)
            .collect();
        for button in stale {
            self.release(button);
        }
    }

    /// Forget this frame's edges; held buttons stay held.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

impl InputSource for InputTracker {
    fn is_just_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn is_pressed(&self, button: Button) -> bool {
        self.down.contains(&button)
    }

    fn is_just_released(&self, button: Button) -> bool {
        self.released.contains(&button)
    }

    fn cursor_position(&self) -> (i32, i32) {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{classify, Key, MouseButton};
    use crate::types::KeyState;

    const SPACE: Button = Button::Key(Key::Space);

    #[test]
    fn press_hold_release_cycle() {
        let now = Instant::now();
        let mut t = InputTracker::new();
        assert_eq!(classify(&t, SPACE), KeyState::Idle);

        t.press(SPACE, now);
        assert_eq!(classify(&t, SPACE), KeyState::JustPressed);
        t.end_frame();

        t.press(SPACE, now); // auto-repeat
        assert_eq!(classify(&t, SPACE), KeyState::Held);
        t.end_frame();

        t.release(SPACE);
        assert_eq!(classify(&t, SPACE), KeyState::JustReleased);
        t.end_frame();
        assert_eq!(classify(&t, SPACE), KeyState::Idle);
    }

    #[test]
    fn tap_within_one_frame_reports_just_pressed() {
        let mut t = InputTracker::new();
        t.press(SPACE, Instant::now());
        t.release(SPACE);
        assert!(t.is_just_released(SPACE));
        assert_eq!(classify(&t, SPACE), KeyState::JustPressed);
    }

    #[test]
    fn expire_releases_stale_keys_only() {
        let start = Instant::now();
        let mouse = Button::Mouse(MouseButton::Left);
        let mut t = InputTracker::new();
        t.press(SPACE, start);
        t.press(mouse, start);
        t.end_frame();

        t.expire(start + Duration::from_millis(500), Duration::from_millis(150));
        assert_eq!(classify(&t, SPACE), KeyState::JustReleased);
        assert_eq!(classify(&t, mouse), KeyState::Held);
    }
}

//! Input sampler: per-frame key and button classification.
//!
//! The tracked set is closed: sixteen keys, two mouse buttons and the cursor.
//! Each present effect samples it exactly once into an input record.

mod tracker;

pub use tracker::InputTracker;

use kurbo::Point;

use crate::geometry::point_to_value;
use crate::types::KeyState;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    Space,
    Backspace,
    W,
    A,
    S,
    D,
    I,
    J,
    K,
    L,
}

/// Keys in input-record order.
pub const TRACKED_KEYS: [Key; 16] = [
    Key::Left,
    Key::Right,
    Key::Up,
    Key::Down,
    Key::Enter,
    Key::Escape,
    Key::Space,
    Key::Backspace,
    Key::W,
    Key::A,
    Key::S,
    Key::D,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Key(Key),
    Mouse(MouseButton),
}

/// Input queries a backend answers for the current frame.
pub trait InputSource {
    fn is_just_pressed(&self, button: Button) -> bool;
    fn is_pressed(&self, button: Button) -> bool;
    fn is_just_released(&self, button: Button) -> bool;
    fn cursor_position(&self) -> (i32, i32);
}

/// Classify one button, first match wins: just-pressed, held, just-released, idle.
pub fn classify<I: InputSource + ?Sized>(input: &I, button: Button) -> KeyState {
    if input.is_just_pressed(button) {
        KeyState::JustPressed
    } else if input.is_pressed(button) {
        KeyState::Held
    } else if input.is_just_released(button) {
        KeyState::JustReleased
    } else {
        KeyState::Idle
    }
}

/// Build the input record: the sixteen key states, the cursor point, then the
/// left and right mouse button states.
pub fn sample<V: Value, I: InputSource + ?Sized>(input: &I) -> V {
    let mut fields: Vec<V> = TRACKED_KEYS
        .iter()
        .map(|key| classify(input, Button::Key(*key)).to_value())
        .collect();

    let (x, y) = input.cursor_position();
    fields.push(point_to_value(Point::new(x as f64, y as f64)));
    fields.push(classify(input, Button::Mouse(MouseButton::Left)).to_value());
    fields.push(classify(input, Button::Mouse(MouseButton::Right)).to_value());
    V::record(fields)
}

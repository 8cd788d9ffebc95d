use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use image::{Rgba, RgbaImage};

use effect_host::canvas::{Canvas, Surface};
use effect_host::config::Config;
use effect_host::input::{Button, InputTracker, Key, MouseButton};
use effect_host::log::MemorySink;
use effect_host::program::{self, frame};
use effect_host::registry::Resources;
use effect_host::render::{Renderer, Tick};
use effect_host::sprite::Sprite;
use effect_host::types::{Alignment, Color, KeyState};
use effect_host::{HostError, Term, Value};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A config with one 2x2 red image at handle 0.
fn config(width: u32, height: u32) -> Config {
    let mut resources = Resources::new();
    resources
        .images
        .register(Sprite::from_image(RgbaImage::from_pixel(2, 2, RED)));
    Config {
        title: "test".to_string(),
        width,
        height,
        scale: 1.0,
        resources,
    }
}

fn red_square() -> Term {
    Term::record(vec![Term::int(0), Term::int(2), Term::int(2)])
}

fn tick_once(program: Term, canvas: &mut Canvas) -> (Tick, MemorySink) {
    let mut sink = MemorySink::default();
    let mut renderer = Renderer::new(config(canvas.width(), canvas.height()), program);
    let tick = renderer
        .tick(canvas, &InputTracker::new(), 60.0, &mut sink)
        .unwrap();
    (tick, sink)
}

fn tick_error(program: Term) -> HostError {
    let mut canvas = Canvas::new(4, 4);
    let mut renderer = Renderer::new(config(4, 4), program);
    renderer
        .tick(&mut canvas, &InputTracker::new(), 60.0, &mut MemorySink::default())
        .unwrap_err()
}

#[test]
fn draws_land_in_program_order() {
    let mut canvas = Canvas::new(4, 4);
    let program = frame::fill(
        Color::new(0.0, 0.0, 1.0, 1.0),
        frame::draw_sprite(
            frame::SpriteDraw::new(red_square(), (1.0, 1.0)),
            frame::present(|_| frame::quit()),
        ),
    );
    let (tick, sink) = tick_once(program, &mut canvas);
    assert_eq!(tick, Tick::Continue);
    assert_eq!(sink.lines, ["FRAME: 60.0 FPS"]);

    let frame = canvas.frame();
    assert_eq!(*frame.get_pixel(0, 0), BLUE);
    assert_eq!(*frame.get_pixel(1, 1), RED);
    assert_eq!(*frame.get_pixel(2, 2), RED);
    assert_eq!(*frame.get_pixel(3, 3), BLUE);

    // Reversed: the fill covers the sprite.
    let mut canvas = Canvas::new(4, 4);
    let program = frame::draw_sprite(
        frame::SpriteDraw::new(red_square(), (1.0, 1.0)),
        frame::fill(Color::new(0.0, 0.0, 1.0, 1.0), frame::present(|_| frame::quit())),
    );
    tick_once(program, &mut canvas);
    assert!(canvas.frame().pixels().all(|p| *p == BLUE));
}

#[test]
fn centered_sprite_is_anchored_at_its_middle() {
    let mut canvas = Canvas::new(6, 6);
    let mut sprite = frame::SpriteDraw::new(red_square(), (3.0, 3.0));
    sprite.alignment = Alignment::Center;
    tick_once(
        frame::draw_sprite(sprite, frame::present(|_| frame::quit())),
        &mut canvas,
    );
    let frame = canvas.frame();
    assert_eq!(*frame.get_pixel(2, 2), RED);
    assert_eq!(*frame.get_pixel(3, 3), RED);
    assert_eq!(*frame.get_pixel(1, 1), CLEAR);
    assert_eq!(*frame.get_pixel(4, 4), CLEAR);
}

#[test]
fn quit_halts_and_later_ticks_do_nothing() {
    let applied = Rc::new(Cell::new(0));
    let counter = applied.clone();
    let program = frame::present(move |_| {
        counter.set(counter.get() + 1);
        frame::log("leaving", frame::quit())
    });

    let mut canvas = Canvas::new(2, 2);
    let mut sink = MemorySink::default();
    let input = InputTracker::new();
    let mut renderer = Renderer::new(config(2, 2), program);

    assert_eq!(renderer.tick(&mut canvas, &input, 30.0, &mut sink).unwrap(), Tick::Continue);
    // Present applies its continuation exactly once.
    assert_eq!(applied.get(), 1);
    assert!(!renderer.is_finished());

    assert_eq!(renderer.tick(&mut canvas, &input, 30.0, &mut sink).unwrap(), Tick::Quit);
    assert!(renderer.is_finished());
    assert_eq!(renderer.tick(&mut canvas, &input, 30.0, &mut sink).unwrap(), Tick::Quit);

    assert_eq!(applied.get(), 1);
    assert_eq!(sink.lines, ["FRAME: 30.0 FPS", "LOG: leaving", "QUIT"]);
}

#[test]
fn skip_drawing_still_runs_the_program() {
    let mut canvas = Canvas::new(3, 3);
    canvas.set_skip_drawing(true);
    assert!(canvas.skip_drawing());
    let program = frame::fill(
        Color::new(1.0, 0.0, 0.0, 1.0),
        frame::log("still here", frame::present(|_| frame::quit())),
    );
    let (tick, sink) = tick_once(program, &mut canvas);
    assert_eq!(tick, Tick::Continue);
    assert_eq!(sink.lines, ["LOG: still here", "FRAME: 60.0 FPS"]);
    assert!(canvas.frame().pixels().all(|p| *p == CLEAR));
}

#[test]
fn builtin_text_sits_on_the_line_below_its_position() {
    let mut canvas = Canvas::new(20, 20);
    let program = frame::draw_text(
        "I",
        frame::default_font(),
        Color::new(1.0, 1.0, 1.0, 1.0),
        (10.0, 10.0),
        Alignment::TopLeft,
        frame::present(|_| frame::quit()),
    );
    tick_once(program, &mut canvas);

    let frame = canvas.frame();
    // Seven-pixel line: one blank row, then the glyph's top bar.
    for x in 10..13 {
        assert_eq!(*frame.get_pixel(x, 10), CLEAR);
        assert_eq!(*frame.get_pixel(x, 11), WHITE);
        assert_eq!(*frame.get_pixel(x, 15), WHITE);
    }
    assert_eq!(*frame.get_pixel(11, 13), WHITE);
    assert_eq!(*frame.get_pixel(10, 13), CLEAR);
    assert_eq!(*frame.get_pixel(13, 11), CLEAR);
}

#[test]
fn present_delivers_the_sampled_input_record() {
    let seen: Rc<RefCell<Option<Term>>> = Rc::default();
    let out = seen.clone();
    let program = frame::present(move |input| {
        *out.borrow_mut() = Some(input);
        frame::quit()
    });

    let now = Instant::now();
    let mut input = InputTracker::new();
    input.press(Button::Key(Key::Escape), now);
    input.press(Button::Key(Key::D), now);
    input.end_frame();
    input.press(Button::Key(Key::Space), now);
    input.press(Button::Mouse(MouseButton::Right), now);
    input.release(Button::Key(Key::D));
    input.move_cursor(7, 9);

    let mut canvas = Canvas::new(2, 2);
    let mut renderer = Renderer::new(config(2, 2), program);
    renderer
        .tick(&mut canvas, &input, 60.0, &mut MemorySink::default())
        .unwrap();

    let record = seen.borrow().clone().unwrap();
    assert_eq!(record.arity().unwrap(), 19);
    assert_eq!(program::key_state(&record, 5), KeyState::Held);
    assert_eq!(program::key_state(&record, 6), KeyState::JustPressed);
    assert_eq!(program::key_state(&record, 11), KeyState::JustReleased);
    assert_eq!(program::key_state(&record, 0), KeyState::Idle);
    let cursor = record.field(16).unwrap();
    assert_eq!(cursor.field(0).unwrap().as_float().unwrap(), 7.0);
    assert_eq!(cursor.field(1).unwrap().as_float().unwrap(), 9.0);
    assert_eq!(program::key_state(&record, 17), KeyState::Idle);
    assert_eq!(program::key_state(&record, 18), KeyState::JustPressed);
}

#[test]
fn unknown_image_handle_is_reported() {
    let missing = Term::record(vec![Term::int(7), Term::int(2), Term::int(2)]);
    let err = tick_error(frame::draw_sprite(
        frame::SpriteDraw::new(missing, (0.0, 0.0)),
        frame::present(|_| frame::quit()),
    ));
    assert!(matches!(err, HostError::UnknownHandle { kind: "image", handle: 7 }));
}

#[test]
fn unknown_render_discriminant_is_a_protocol_error() {
    let err = tick_error(Term::effect(6, vec![]));
    assert!(matches!(
        err,
        HostError::Protocol { phase: "render", discriminant: 6 }
    ));
}

#[test]
fn text_far_off_canvas_draws_nothing() {
    for position in [(1.0e10, 1.0e10), (-1.0e10, 0.0), (0.0, -1.0e10)] {
        let mut canvas = Canvas::new(8, 8);
        let program = frame::draw_text(
            "HI",
            frame::default_font(),
            Color::new(1.0, 1.0, 1.0, 1.0),
            position,
            Alignment::BottomRight,
            frame::present(|_| frame::quit()),
        );
        let (tick, _) = tick_once(program, &mut canvas);
        assert_eq!(tick, Tick::Continue);
        assert!(canvas.frame().pixels().all(|p| *p == CLEAR));
    }
}

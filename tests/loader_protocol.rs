use std::cell::RefCell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use effect_host::error::ResourceError;
use effect_host::loader::{run_loader, Loaded};
use effect_host::log::MemorySink;
use effect_host::program::{frame, setup};
use effect_host::types::Color;
use effect_host::{HostError, Term, Value};

fn solid(r: f64, g: f64, b: f64) -> impl Fn(Term) -> Term + 'static {
    move |_| Color::new(r, g, b, 1.0).to_value()
}

fn expect_error(program: Term) -> HostError {
    match run_loader(program, &mut MemorySink::default()) {
        Err(e) => e,
        Ok(_) => panic!("loader accepted the program"),
    }
}

fn int(value: &Term, path: &[usize]) -> i64 {
    let mut v = value.clone();
    for i in path {
        v = v.field(*i).unwrap();
    }
    v.as_int().unwrap()
}

#[test]
fn effects_run_in_program_order_with_dense_handles() {
    let seen: Rc<RefCell<Vec<Term>>> = Rc::default();
    let (a, b) = (seen.clone(), seen.clone());

    let program = setup::log(
        "first",
        setup::generate_image(2, 3, solid(1.0, 0.0, 0.0), move |red| {
            a.borrow_mut().push(red);
            let b = b.clone();
            setup::generate_image(1, 1, solid(0.0, 1.0, 0.0), move |green| {
                b.borrow_mut().push(green);
                setup::log("last", setup::start("t", 8, 8, 1.0, frame::quit()))
            })
        }),
    );

    let mut sink = MemorySink::default();
    let Loaded::Start { config, .. } = run_loader(program, &mut sink).unwrap() else {
        panic!("expected start");
    };

    assert_eq!(
        sink.lines,
        ["LOG: first", "GENERATE: 2x3", "GENERATE: 1x1", "LOG: last"]
    );
    let seen = seen.borrow();
    assert_eq!(int(&seen[0], &[0]), 0);
    assert_eq!((int(&seen[0], &[1]), int(&seen[0], &[2])), (2, 3));
    assert_eq!(int(&seen[1], &[0]), 1);

    assert_eq!(config.resources.images.len(), 2);
    let red = config.resources.images.lookup(0).unwrap();
    assert_eq!(red.pixel(1, 2), Rgba([255, 0, 0, 255]));
    // Font 0 is always the built-in face.
    assert_eq!(config.resources.fonts.len(), 1);
}

#[test]
fn start_hands_over_config_and_first_frame() {
    let program = setup::start("window", 320, 200, 2.5, frame::log("frame one", frame::quit()));
    let mut sink = MemorySink::default();
    let Loaded::Start { config, first_frame } = run_loader(program, &mut sink).unwrap() else {
        panic!("expected start");
    };
    assert_eq!(config.title, "window");
    assert_eq!((config.width, config.height), (320, 200));
    assert_eq!(config.scale, 2.5);
    assert!(sink.lines.is_empty());
    assert_eq!(first_frame.field(0).unwrap().as_string().unwrap(), "frame one");
}

#[test]
fn quit_ends_setup_without_start() {
    let mut sink = MemorySink::default();
    let loaded = run_loader(setup::log("hi", setup::quit()), &mut sink).unwrap();
    assert!(matches!(loaded, Loaded::Quit));
    assert_eq!(sink.lines, ["LOG: hi", "QUIT"]);
}

#[test]
fn sprite_sheet_is_sliced_row_major_into_whole_tiles() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sheet.png");
    let mut sheet = RgbaImage::new(10, 7);
    // Mark the tile at row 1, column 2.
    sheet.put_pixel(6, 2, Rgba([9, 8, 7, 255]));
    sheet.save(&path).unwrap();

    let rows: Rc<RefCell<Option<Term>>> = Rc::default();
    let out = rows.clone();
    let program = setup::load_sprite_sheet(path.to_str().unwrap(), 3, 2, move |tiles| {
        *out.borrow_mut() = Some(tiles);
        setup::start("t", 1, 1, 1.0, frame::quit())
    });

    let mut sink = MemorySink::default();
    let Loaded::Start { config, .. } = run_loader(program, &mut sink).unwrap() else {
        panic!("expected start");
    };
    assert_eq!(sink.lines, [format!("LOAD: {}", path.display())]);

    let rows = rows.borrow().clone().unwrap();
    assert_eq!(rows.arity().unwrap(), 3);
    for r in 0..3 {
        let row = rows.field(r).unwrap();
        assert_eq!(row.arity().unwrap(), 3);
        for c in 0..3 {
            let tile = row.field(c).unwrap();
            assert_eq!(int(&tile, &[0]), (r * 3 + c) as i64);
            assert_eq!((int(&tile, &[1]), int(&tile, &[2])), (3, 2));
        }
    }

    let marked = config.resources.images.lookup(5).unwrap();
    assert_eq!(marked.bounds(), (6, 2, 3, 2));
    assert_eq!(marked.pixel(0, 0), Rgba([9, 8, 7, 255]));
}

#[test]
fn load_text_passes_file_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("level.txt");
    std::fs::write(&path, "##..\n..##\n").unwrap();

    let text: Rc<RefCell<String>> = Rc::default();
    let out = text.clone();
    let program = setup::load_text(path.to_str().unwrap(), move |content| {
        *out.borrow_mut() = content.as_string().unwrap();
        setup::quit()
    });
    run_loader(program, &mut MemorySink::default()).unwrap();
    assert_eq!(*text.borrow(), "##..\n..##\n");
}

#[test]
fn missing_files_are_resource_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.png");
    let missing = missing.to_str().unwrap();

    let err = expect_error(setup::load_image(missing, |_| setup::quit()));
    assert!(matches!(err, HostError::Resource { source: ResourceError::Image(_), .. }));

    let err = expect_error(setup::load_text(missing, |_| setup::quit()));
    assert!(matches!(err, HostError::Resource { source: ResourceError::Io(_), .. }));
    assert!(err.to_string().contains("nope.png"));
}

#[test]
fn garbage_font_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.ttf");
    std::fs::write(&path, b"definitely not a font").unwrap();

    let err = expect_error(setup::load_font(path.to_str().unwrap(), 12.0, |_| setup::quit()));
    assert!(matches!(err, HostError::Resource { source: ResourceError::Font(_), .. }));
}

#[test]
fn unknown_discriminant_is_a_protocol_error() {
    let err = expect_error(Term::effect(42, vec![]));
    assert!(matches!(
        err,
        HostError::Protocol { phase: "loader", discriminant: 42 }
    ));
}

#[test]
fn wrong_field_count_is_an_arity_error() {
    let err = expect_error(Term::effect(1, vec![Term::string("no continuation")]));
    assert!(matches!(
        err,
        HostError::Arity { effect: "log", expected: 2, found: 1, .. }
    ));
}

#[test]
fn zero_tile_size_is_rejected_before_loading() {
    let err = expect_error(setup::load_sprite_sheet("unused.png", 0, 8, |_| setup::quit()));
    assert!(matches!(err, HostError::InvalidArgument { what: "tile width", .. }));
}

#[test]
fn generated_red_image_and_first_frame_reach_the_render_phase() {
    use effect_host::canvas::Canvas;
    use effect_host::input::InputTracker;
    use effect_host::render::{Renderer, Tick};

    let program = setup::generate_image(2, 2, solid(1.0, 0.0, 0.0), |image| {
        setup::start(
            "T",
            100,
            100,
            1.0,
            frame::draw_sprite(
                frame::SpriteDraw::new(image, (0.0, 0.0)),
                frame::present(|_| frame::quit()),
            ),
        )
    });
    let mut sink = MemorySink::default();
    let Loaded::Start { config, first_frame } = run_loader(program, &mut sink).unwrap() else {
        panic!("expected start");
    };
    let image = config.resources.images.lookup(0).unwrap();
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(image.pixel(x, y), Rgba([255, 0, 0, 255]));
    }

    let mut canvas = Canvas::new(config.width, config.height);
    let mut renderer = Renderer::new(config, first_frame);
    let tick = renderer
        .tick(&mut canvas, &InputTracker::new(), 60.0, &mut sink)
        .unwrap();
    assert_eq!(tick, Tick::Continue);
    assert_eq!(*canvas.frame().get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    assert_eq!(*canvas.frame().get_pixel(2, 2), Rgba([0, 0, 0, 0]));
}

#[test]
fn load_text_replaces_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.txt");
    std::fs::write(&path, [b'c', b'a', b'f', 0xe9, b'\n']).unwrap();

    let text: Rc<RefCell<String>> = Rc::default();
    let out = text.clone();
    let program = setup::load_text(path.to_str().unwrap(), move |content| {
        *out.borrow_mut() = content.as_string().unwrap();
        setup::quit()
    });
    run_loader(program, &mut MemorySink::default()).unwrap();
    assert_eq!(*text.borrow(), "caf\u{fffd}\n");
}

#[test]
fn load_image_registers_the_decoded_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tile.png");
    let image = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 80, y as u8 * 200, 7, 255]));
    image.save(&path).unwrap();

    let seen: Rc<RefCell<Option<Term>>> = Rc::default();
    let out = seen.clone();
    let program = setup::generate_image(1, 1, solid(0.0, 0.0, 0.0), move |_| {
        let out = out.clone();
        setup::load_image(path.to_str().unwrap(), move |descriptor| {
            *out.borrow_mut() = Some(descriptor);
            setup::start("t", 1, 1, 1.0, frame::quit())
        })
    });
    let mut sink = MemorySink::default();
    let Loaded::Start { config, .. } = run_loader(program, &mut sink).unwrap() else {
        panic!("expected start");
    };
    assert_eq!(sink.lines[1], format!("LOAD: {}", dir.path().join("tile.png").display()));

    let descriptor = seen.borrow().clone().unwrap();
    assert_eq!(int(&descriptor, &[0]), 1);
    assert_eq!((int(&descriptor, &[1]), int(&descriptor, &[2])), (3, 2));

    let loaded = config.resources.images.lookup(1).unwrap();
    for (x, y, pixel) in image.enumerate_pixels() {
        assert_eq!(loaded.pixel(x, y), *pixel);
    }
}

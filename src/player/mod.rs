//! Player: the terminal frame driver.
//!
//! Owns the timing loop: once per refresh it feeds terminal input to the
//! tracker, ticks the renderer into the canvas, and presents the canvas as
//! half-block cells. The player never interprets effects itself.

mod clock;
mod headless;

pub use clock::FpsCounter;
pub use headless::Headless;

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    MouseEvent, MouseEventKind,
};
use crossterm::{cursor, execute, queue, style, terminal};
use image::RgbaImage;

use crate::canvas::{Canvas, Surface};
use crate::input::{Button, InputTracker, Key, MouseButton};
use crate::log::{format_line, LogSink};
use crate::types::LogKind;
use crate::menubar::{print_menu_item, print_title};
use crate::render::{Renderer, Tick};
use crate::settings::HostSettings;
use crate::value::Value;

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;

/// Smallest terminal the player will draw into.
const MIN_TERMINAL: (u16, u16) = (16, 4);

/// Program log lines kept for printing once the terminal is restored.
const RETAINED_LINES: usize = 1000;

pub struct Player<V> {
    renderer: Renderer<V>,
    canvas: Canvas,
    settings: HostSettings,
    input: InputTracker,
    status: StatusSink,
    fps: FpsCounter,
    layout: Layout,
    /// Last presented cell colors, for diffing.
    cells: Vec<Option<CellColors>>,
    releases_reported: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Abort,
}

impl<V: Value> Player<V> {
    pub fn new(renderer: Renderer<V>, settings: HostSettings) -> Result<Self> {
        let config = renderer.config();
        let canvas = Canvas::new(config.width, config.height);
        let status = StatusSink::open(settings.log_file.as_deref())?;
        Ok(Self {
            renderer,
            canvas,
            settings,
            input: InputTracker::new(),
            status,
            fps: FpsCounter::new(),
            layout: Layout::default(),
            cells: Vec::new(),
            releases_reported: false,
        })
    }

    /// Run the render phase in the terminal until the program quits or the
    /// user presses Ctrl-C.
    ///
    /// Sets up the terminal, enters the frame loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_w < MIN_TERMINAL.0 || term_h < MIN_TERMINAL.1 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_TERMINAL.0,
                MIN_TERMINAL.1,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::SetTitle(&self.renderer.config().title),
            cursor::Hide,
            event::EnableMouseCapture,
            event::EnableFocusChange,
            terminal::Clear(terminal::ClearType::All),
        )?;
        self.releases_reported = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.releases_reported {
            execute!(
                stdout,
                event::PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES),
            )?;
        }
        tracing::debug!(releases_reported = self.releases_reported, "terminal ready");

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        if self.releases_reported {
            let _ = execute!(stdout, event::PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            stdout,
            event::DisableFocusChange,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();

        if let Err(e) = self.status.flush_retained(&mut stdout) {
            tracing::warn!("failed to print retained log lines: {e}");
        }

        result
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let frame_time = Duration::from_secs_f64(1.0 / self.settings.target_fps as f64);
        let release_timeout = Duration::from_millis(self.settings.key_release_ms);
        self.relayout(stdout)?;

        loop {
            let started = Instant::now();
            if self.drain_events(stdout, started)? == Control::Abort {
                break;
            }
            if !self.releases_reported {
                self.input.expire(started, release_timeout);
            }

            let tick = self.renderer.tick(
                &mut self.canvas,
                &self.input,
                self.fps.current(),
                &mut self.status,
            )?;
            self.input.end_frame();
            if tick == Tick::Quit {
                break;
            }
            self.fps.record(Instant::now());

            if !self.canvas.skip_drawing() {
                self.render_canvas(stdout)?;
            }
            if self.settings.show_status {
                self.render_status(stdout)?;
            }

            if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }

        Ok(())
    }

    fn drain_events(&mut self, stdout: &mut io::Stdout, now: Instant) -> Result<Control> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if is_abort(&key) {
                        return Ok(Control::Abort);
                    }
                    if let Some(k) = map_key(key.code) {
                        match key.kind {
                            KeyEventKind::Release => self.input.release(Button::Key(k)),
                            KeyEventKind::Press | KeyEventKind::Repeat => {
                                self.input.press(Button::Key(k), now)
                            }
                        }
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse(mouse, now),
                Event::FocusLost => {
                    self.canvas.set_skip_drawing(true);
                    self.input.release_all();
                }
                Event::FocusGained => {
                    self.canvas.set_skip_drawing(false);
                    self.relayout(stdout)?;
                }
                Event::Resize(_, _) => self.relayout(stdout)?,
                _ => {}
            }
        }
        Ok(Control::Continue)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (x, y) = self.layout.cell_to_pixel(mouse.column, mouse.row);
        self.input.move_cursor(x, y);
        match mouse.kind {
            MouseEventKind::Down(button) => {
                if let Some(b) = map_mouse(button) {
                    self.input.press(Button::Mouse(b), now);
                }
            }
            MouseEventKind::Up(button) => {
                if let Some(b) = map_mouse(button) {
                    self.input.release(Button::Mouse(b));
                }
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn relayout(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let reserved = CANVAS_OFFSET + u16::from(self.settings.show_status);
        self.layout = Layout::compute(
            self.canvas.width(),
            self.canvas.height(),
            term_w,
            term_h.saturating_sub(reserved),
        );
        self.cells = vec![None; self.layout.cols as usize * self.layout.rows as usize];
        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
        self.render_menubar(stdout)
    }

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        print_title(stdout, &self.renderer.config().title)?;
        for item in ["[←↑→↓][WASD][IJKL] keys", "[mouse] cursor", "[Ctrl-C] abort"] {
            queue!(stdout, style::Print("  "))?;
            print_menu_item(stdout, item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Emit only the cells whose colors changed since the last frame.
    fn render_canvas(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let frame = self.canvas.frame();
        for cy in 0..self.layout.rows {
            for cx in 0..self.layout.cols {
                let colors = self.layout.cell_colors(frame, cx, cy);
                let slot = &mut self.cells[cy as usize * self.layout.cols as usize + cx as usize];
                if *slot == Some(colors) {
                    continue;
                }
                *slot = Some(colors);
                let ([tr, tg, tb], [br, bg, bb]) = colors;
                queue!(
                    stdout,
                    cursor::MoveTo(cx, cy + CANVAS_OFFSET),
                    style::SetForegroundColor(style::Color::Rgb { r: tr, g: tg, b: tb }),
                    style::SetBackgroundColor(style::Color::Rgb { r: br, g: bg, b: bb }),
                    style::Print('▀'),
                )?;
            }
        }
        queue!(stdout, style::ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.layout.rows + CANVAS_OFFSET;
        let (term_w, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let last = self.status.last.as_deref().unwrap_or("");
        let mut status = format!(" {:.1} FPS | {last} ", self.fps.current());
        status = status.chars().take(term_w as usize).collect();

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

type CellColors = ([u8; 3], [u8; 3]);

/// Fit of the canvas onto terminal cells. Each cell shows two vertically
/// stacked pixels sampled `step` canvas pixels apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    step: u32,
    cols: u16,
    rows: u16,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            step: 1,
            cols: 0,
            rows: 0,
        }
    }
}

impl Layout {
    fn compute(width: u32, height: u32, avail_cols: u16, avail_rows: u16) -> Self {
        let avail_cols = u32::from(avail_cols.max(1));
        let avail_px_rows = 2 * u32::from(avail_rows.max(1));
        let step = width
            .div_ceil(avail_cols)
            .max(height.div_ceil(avail_px_rows))
            .max(1);
        Layout {
            step,
            cols: width.div_ceil(step) as u16,
            rows: height.div_ceil(2 * step) as u16,
        }
    }

    fn cell_to_pixel(&self, column: u16, row: u16) -> (i32, i32) {
        let x = u32::from(column) * self.step;
        let y = u32::from(row.saturating_sub(CANVAS_OFFSET)) * 2 * self.step;
        (x as i32, y as i32)
    }

    /// Top and bottom pixel colors of a cell, composited over black.
    fn cell_colors(&self, frame: &RgbaImage, cx: u16, cy: u16) -> CellColors {
        let x = u32::from(cx) * self.step;
        let top = u32::from(cy) * 2 * self.step;
        (
            opaque(frame, x, top),
            opaque(frame, x, top + self.step),
        )
    }
}

fn opaque(frame: &RgbaImage, x: u32, y: u32) -> [u8; 3] {
    match frame.get_pixel_checked(x, y) {
        Some(p) => {
            let a = p[3] as u16;
            let over = |c: u8| (c as u16 * a / 255) as u8;
            [over(p[0]), over(p[1]), over(p[2])]
        }
        None => [0, 0, 0],
    }
}

// ---------------------------------------------------------------------------
// Input mapping
// ---------------------------------------------------------------------------

fn is_abort(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            ' ' => Key::Space,
            'w' => Key::W,
            'a' => Key::A,
            's' => Key::S,
            'd' => Key::D,
            'i' => Key::I,
            'j' => Key::J,
            'k' => Key::K,
            'l' => Key::L,
            _ => return None,
        },
        _ => return None,
    };
    Some(key)
}

fn map_mouse(button: event::MouseButton) -> Option<MouseButton> {
    match button {
        event::MouseButton::Left => Some(MouseButton::Left),
        event::MouseButton::Right => Some(MouseButton::Right),
        event::MouseButton::Middle => None,
    }
}

// ---------------------------------------------------------------------------
// Status log
// ---------------------------------------------------------------------------

/// Keeps the latest program log line for the status bar and optionally
/// appends every line to a file. Frame lines go to the file only; the status
/// bar already shows the frame rate. Other lines are also retained so they
/// can be printed after the alternate screen is left.
struct StatusSink {
    last: Option<String>,
    retained: VecDeque<String>,
    file: Option<File>,
}

impl StatusSink {
    fn open(path: Option<&std::path::Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file {}", path.display()))?,
            ),
            None => None,
        };
        Ok(StatusSink {
            last: None,
            retained: VecDeque::new(),
            file,
        })
    }
}

impl StatusSink {
    fn append(&mut self, line: &str) {
        if let Some(file) = &mut self.file {
            if let Err(e) = writeln!(file, "{line}") {
                tracing::warn!("log file write failed, disabling: {e}");
                self.file = None;
            }
        }
    }

    /// Write out and forget the non-frame lines seen so far, oldest first.
    fn flush_retained(&mut self, out: &mut impl Write) -> io::Result<()> {
        for line in self.retained.drain(..) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

impl LogSink for StatusSink {
    fn write_line(&mut self, line: &str) {
        self.append(line);
        if self.retained.len() == RETAINED_LINES {
            self.retained.pop_front();
        }
        self.retained.push_back(line.to_string());
        self.last = Some(line.to_string());
    }

    fn log(&mut self, kind: Option<LogKind>, message: &str) {
        let line = format_line(kind, message);
        if kind == Some(LogKind::Frame) {
            self.append(&line);
        } else {
            self.write_line(&line);
        }
    }
}

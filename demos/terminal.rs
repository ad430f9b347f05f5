//! Terminal carousel demo.
//!
//! Four slides, looping autoplay, drag with the mouse, ←/→ to navigate,
//! `q` to quit.
//!
//! Run with: RUST_LOG=debug cargo run --example terminal

use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{Event, KeyCode};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use spark_carousel::input::{disable_mouse, enable_mouse, poll_event};
use spark_carousel::{
    CarouselOptions, ElementFlags, Host, Indicator, MemoryHost, SlideController, SlideSize,
    SlideStyle, TerminalInput, Viewport,
};

const CELL_WIDTH: f32 = 8.0;
const SLIDE_ROWS: u16 = 5;
const SLIDES: [&str; 4] = ["Aurora", "Basalt", "Cirrus", "Dunes"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (columns, _) = terminal::size()?;
    let width = f32::from(columns) * CELL_WIDTH;
    let height = f32::from(SLIDE_ROWS) * 16.0;

    let (mut host, _, wrapper) = MemoryHost::with_slides("#demo", 0, SlideSize::new(width, height));
    for name in SLIDES {
        let slide = host.add_slide(wrapper, SlideStyle::px(width, height));
        host.set_label(slide, name);
    }

    let options = CarouselOptions::default()
        .with_loop(true)
        .with_autoplay(true)
        .with_delay(2500)
        .with_draggable(true)
        .with_indicator(Indicator::Number);
    let mut carousel = SlideController::new(host, "#demo", options)?;
    let mut input = TerminalInput::new(Viewport::new(0, 0, columns, SLIDE_ROWS), CELL_WIDTH);

    terminal::enable_raw_mode()?;
    enable_mouse()?;
    execute!(stdout(), EnterAlternateScreen, Hide)?;

    let result = event_loop(&mut carousel, &mut input);

    execute!(stdout(), Show, LeaveAlternateScreen)?;
    disable_mouse()?;
    terminal::disable_raw_mode()?;

    result
}

fn event_loop(
    carousel: &mut SlideController<MemoryHost>,
    input: &mut TerminalInput,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last = Instant::now();
    loop {
        if let Some(event) = poll_event(Duration::from_millis(16))? {
            if let Event::Key(key) = &event {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(());
                }
            }
            if let Event::Resize(columns, _) = event {
                input.set_viewport(Viewport::new(0, 0, columns, SLIDE_ROWS));
            }
            for converted in input.convert(&event) {
                carousel.handle(converted);
            }
        }

        let elapsed = last.elapsed();
        last = Instant::now();
        carousel.advance(elapsed.as_millis() as u64)?;

        render(carousel)?;
    }
}

fn render(carousel: &SlideController<MemoryHost>) -> io::Result<()> {
    let host = carousel.host();
    let mut out = stdout();

    let slot_width = carousel.slide_size().width.max(1.0);
    let offset = -host.translate_x(carousel.wrapper());
    let strip = host.children(carousel.wrapper());
    let slot = ((offset / slot_width).round().max(0.0) as usize).min(strip.len().saturating_sub(1));
    let label = strip.get(slot).map(|&s| host.label(s)).unwrap_or("");

    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    queue!(out, MoveTo(2, SLIDE_ROWS / 2))?;
    write!(out, "◀  {label}  ▶   (x = {offset:.0}px, index {})", carousel.current_index())?;

    queue!(out, MoveTo(2, SLIDE_ROWS + 1))?;
    for &indicator in carousel.indicators() {
        let text = host.label(indicator);
        if host.flags(indicator).contains(ElementFlags::ACTIVE) {
            write!(out, "[{text}] ")?;
        } else {
            write!(out, " {text}  ")?;
        }
    }

    queue!(out, MoveTo(2, SLIDE_ROWS + 3))?;
    write!(out, "drag to swipe · ←/→ navigate · q quit")?;
    out.flush()
}

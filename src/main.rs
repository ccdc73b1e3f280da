use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use termworks::{Container, Fireworks, Options, Rgba, logging, present};

/// Host repaint cadence, matching a 60 Hz display.
const REPAINT: Duration = Duration::from_micros(16_667);
const DEFAULT_SCALE: usize = 4;

fn print_usage() {
    eprintln!("termworks - Fireworks in your terminal");
    eprintln!();
    eprintln!("Usage: termworks [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --fps N            Target frame rate (default 60)");
    eprintln!("  --count N          Fireworks kept in the sky at once (default 8)");
    eprintln!("  --interval MS      Launch interval in milliseconds (default 400)");
    eprintln!("  --colors C1,C2,..  Palette, e.g. '#ff1e1e,hsl(210, 100%, 50%)'");
    eprintln!("  --size N           Base particle size in pixels (default 15)");
    eprintln!("  --speed N          Particle launch speed (default 15)");
    eprintln!("  --gravity N        Downward pull per frame (default 0.08)");
    eprintln!("  --power N          Velocity kept per frame (default 0.93)");
    eprintln!("  --shrink N         Size kept per frame (default 0.97)");
    eprintln!("  --jitter N         Random wobble per frame (default 1)");
    eprintln!("  --config FILE      Read options from a TOML file");
    eprintln!("  --bg-color RRGGBB  Set background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!("  --scale N          Canvas pixels per terminal half cell (default 4)");
    eprintln!("  --log FILE         Append logs to FILE (filter with TERMWORKS_LOG)");
    eprintln!("  --log-filter F     Log filter directives, overriding TERMWORKS_LOG");
    eprintln!();
    eprintln!("Press 'q', ESC, or Ctrl+C to exit");
}

struct Args {
    options: Options,
    config: Option<PathBuf>,
    bg_color: Rgba,
    scale: usize,
    log: Option<PathBuf>,
    log_filter: Option<String>,
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!();
    print_usage();
    process::exit(1);
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fail(&format!("Invalid value for {}: {}", flag, value)))
}

fn parse_hex_color(hex: &str) -> Option<Rgba> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    format!("#{}", hex).parse().ok()
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();

    let mut parsed = Args {
        options: Options::default(),
        config: None,
        bg_color: Rgba::BLACK,
        scale: DEFAULT_SCALE,
        log: None,
        log_filter: None,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "help" | "--help" | "-h") {
            print_usage();
            process::exit(0);
        }

        let Some(value) = args.get(i + 1) else {
            fail(&format!("{} requires a value", flag));
        };
        let options = &mut parsed.options;
        match flag {
            "--fps" => options.fps = Some(parse_number(flag, value)),
            "--count" => options.firework_count = Some(parse_number(flag, value)),
            "--interval" => options.firework_interval = Some(parse_number(flag, value)),
            "--size" => options.particle.size = Some(parse_number(flag, value)),
            "--speed" => options.particle.speed = Some(parse_number(flag, value)),
            "--gravity" => options.particle.gravity = Some(parse_number(flag, value)),
            "--power" => options.particle.power = Some(parse_number(flag, value)),
            "--shrink" => options.particle.shrink = Some(parse_number(flag, value)),
            "--jitter" => options.particle.jitter = Some(parse_number(flag, value)),
            "--colors" => {
                let colors = split_colors(value)
                    .into_iter()
                    .map(|c| c.parse::<Rgba>())
                    .collect::<Result<Vec<_>, _>>()
                    .unwrap_or_else(|err| fail(&err.to_string()));
                options.firework_colors = Some(colors);
            }
            "--config" => parsed.config = Some(PathBuf::from(value)),
            "--log" => parsed.log = Some(PathBuf::from(value)),
            "--log-filter" => parsed.log_filter = Some(value.clone()),
            "--scale" => parsed.scale = parse_number::<usize>(flag, value).max(1),
            "--bg-color" => {
                parsed.bg_color = parse_hex_color(value).unwrap_or_else(|| {
                    fail(&format!(
                        "Invalid hex color: {}\nExpected format: RRGGBB (e.g., 1a1b26)",
                        value
                    ))
                });
            }
            _ => fail(&format!("Unknown option: {}", flag)),
        }
        i += 2;
    }

    parsed
}

/// Splits a palette list on commas that are not inside parentheses.
fn split_colors(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in list.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn build(
    cols: u16,
    rows: u16,
    scale: usize,
    bg: Rgba,
    options: &Options,
) -> termworks::Result<(Fireworks, present::Presenter)> {
    let (width, height) = present::canvas_size(cols as usize, rows as usize, scale);
    let mut engine = Fireworks::new(Container::Area { width, height }, options.clone())?;
    engine.start();
    let presenter = present::Presenter::new(cols as usize, rows as usize, scale, bg);
    Ok((engine, presenter))
}

fn run(args: Args, options: Options) -> termworks::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = run_loop(&mut stdout, &args, &options);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    stdout.flush()?;

    result
}

fn run_loop<W: Write>(out: &mut W, args: &Args, options: &Options) -> termworks::Result<()> {
    let (cols, rows) = terminal::size()?;
    let (mut engine, mut presenter) = build(cols, rows, args.scale, args.bg_color, options)?;

    let mut last_frame = Instant::now();

    loop {
        let budget = REPAINT.saturating_sub(last_frame.elapsed());
        if event::poll(budget)? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                }
                Event::Resize(cols, rows) => {
                    engine.stop();
                    (engine, presenter) = build(cols, rows, args.scale, args.bg_color, options)?;
                    execute!(out, Clear(ClearType::All))?;
                }
                _ => {}
            }
            continue;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame);
        last_frame = now;

        if engine.advance(elapsed) {
            presenter.present(engine.surface(), out)?;
        }
    }

    engine.stop();
    Ok(())
}

fn main() {
    let args = parse_args();

    if let Err(err) = logging::init(args.log.as_deref(), args.log_filter.as_deref()) {
        eprintln!("Cannot open log file: {}", err);
        process::exit(1);
    }

    let file_options = match &args.config {
        Some(path) => Options::load(path).unwrap_or_else(|err| {
            eprintln!("{}", err);
            process::exit(1);
        }),
        None => Options::default(),
    };
    let options = file_options.merge(args.options.clone());

    if let Err(err) = run(args, options) {
        eprintln!("termworks: {}", err);
        process::exit(1);
    }
}

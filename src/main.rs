use crossterm::{
    cursor::{Hide, Show as ShowCursor},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::fs::File;
use std::io::{BufWriter, Stdout, Write, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

use fireworks::color::{Rgba, parse_hex_color};
use fireworks::{
    Action, Config, Error, HeartPattern, Launcher, RecordingSurface, Result, Scheduler, Show,
    Surface, TerminalCanvas, TriggerMode, rng,
};

/// Surface size used when running without a terminal.
const HEADLESS_SIZE: (f32, f32) = (1280.0, 720.0);
const HEART_SHELLS: usize = 24;

fn print_usage() {
    eprintln!("fireworks - Particle fireworks in the terminal");
    eprintln!();
    eprintln!("Usage: fireworks [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config PATH       Load settings from a TOML file");
    eprintln!("  --mode MODE         bulk (default), burst or idle");
    eprintln!("  --delay SECS        Wait before the mode starts");
    eprintln!("  --bg-color RRGGBB   Set background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!("  --heart STYLE       ring (default) or curve");
    eprintln!("  --seed N            Seed the random source for a repeatable show");
    eprintln!("  --log-file PATH     Write logs to PATH");
    eprintln!("  --log-level LEVEL   trace, debug, info (default), warn or error");
    eprintln!("  --headless TICKS    Simulate TICKS frames without a terminal and print a summary");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  space  Start the bulk launch (once)");
    eprintln!("  b      Launch a burst");
    eprintln!("  h      Launch a heart-shaped volley");
    eprintln!("  s      Stop periodic launches");
    eprintln!();
    eprintln!("Press 'q', ESC, or Ctrl+C to exit");
}

/// Command-line flags; anything set here overrides the config file.
#[derive(Default)]
struct Cli {
    help: bool,
    config: Option<PathBuf>,
    mode: Option<TriggerMode>,
    delay_ms: Option<u64>,
    bg_color: Option<String>,
    heart: Option<HeartPattern>,
    seed: Option<u64>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    headless: Option<u64>,
}

fn parse_args(args: &[String]) -> Result<Cli> {
    let mut cli = Cli::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "help" | "--help" | "-h") {
            cli.help = true;
            i += 1;
            continue;
        }

        let value = args
            .get(i + 1)
            .ok_or_else(|| Error::InvalidArgument(format!("{flag} requires a value")))?;
        match flag {
            "--config" => cli.config = Some(PathBuf::from(value)),
            "--mode" => {
                cli.mode = Some(TriggerMode::parse(value).ok_or_else(|| {
                    Error::InvalidArgument(format!("unknown mode: {value}"))
                })?)
            }
            "--delay" => {
                let secs: f64 = value
                    .parse()
                    .ok()
                    .filter(|s: &f64| s.is_finite() && *s >= 0.0)
                    .ok_or_else(|| Error::InvalidArgument(format!("invalid delay: {value}")))?;
                cli.delay_ms = Some((secs * 1000.0) as u64);
            }
            "--bg-color" => {
                if parse_hex_color(value).is_none() {
                    return Err(Error::InvalidArgument(format!(
                        "invalid hex color: {value} (expected RRGGBB, e.g. 1a1b26)"
                    )));
                }
                cli.bg_color = Some(value.clone());
            }
            "--heart" => {
                cli.heart = Some(HeartPattern::parse(value).ok_or_else(|| {
                    Error::InvalidArgument(format!("unknown heart style: {value}"))
                })?)
            }
            "--seed" => {
                cli.seed = Some(value.parse().map_err(|_| {
                    Error::InvalidArgument(format!("invalid seed: {value}"))
                })?)
            }
            "--log-file" => cli.log_file = Some(PathBuf::from(value)),
            "--log-level" => cli.log_level = Some(value.clone()),
            "--headless" => {
                cli.headless = Some(value.parse().map_err(|_| {
                    Error::InvalidArgument(format!("invalid tick count: {value}"))
                })?)
            }
            _ => return Err(Error::InvalidArgument(format!("unknown option: {flag}"))),
        }
        i += 2;
    }

    Ok(cli)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.start_delay_ms = delay_ms;
    }
    if let Some(bg_color) = &cli.bg_color {
        config.bg_color = bg_color.clone();
    }
    if let Some(heart) = cli.heart {
        config.heart = heart;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Logs go to a file since the terminal is busy drawing.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let level: tracing::Level = config
        .log_level
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("unknown log level {:?}", config.log_level)))?;
    let file = File::create(path)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn run_terminal(config: &Config) -> Result<()> {
    let (cols, rows) = terminal::size()
        .map_err(|e| Error::SurfaceUnavailable(format!("cannot query terminal size: {e}")))?;
    let mut canvas = TerminalCanvas::new(cols, rows, config.scale, config.background())?;
    info!(cols, rows, width = canvas.width(), height = canvas.height(), "surface ready");

    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    let result = screen_session(&mut stdout, |out| frame_loop(config, &mut canvas, out));
    let restored = terminal::disable_raw_mode();
    result.and(restored.map_err(Error::from))
}

/// Runs `body` on the alternate screen and always tries to leave it again,
/// even when entering failed.
fn screen_session<W: Write>(
    out: &mut W,
    body: impl FnOnce(&mut W) -> Result<()>,
) -> Result<()> {
    let result = execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))
        .map_err(Error::from)
        .and_then(|()| body(out));
    let restored = execute!(out, ShowCursor, LeaveAlternateScreen);
    result.and(restored.map_err(Error::from))
}

fn frame_loop(
    config: &Config,
    canvas: &mut TerminalCanvas,
    stdout: &mut BufWriter<Stdout>,
) -> Result<()> {
    let mut show = Show::new(rng::from_seed(config.seed), config.heart);
    let mut scheduler = Scheduler::new();
    let mut launcher = Launcher::new(config.launch_policy(), canvas.width(), canvas.height());
    if let Some(action) = config.mode.action() {
        scheduler.schedule_once(config.start_delay(), action);
    }

    let trail = Rgba::new(config.background(), config.trail_alpha);
    let frame_duration = config.frame_duration();
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char(' ') => {
                        launcher.handle(Action::Bulk, &mut show, &mut scheduler);
                    }
                    KeyCode::Char('b') => {
                        launcher.handle(Action::Burst, &mut show, &mut scheduler);
                    }
                    KeyCode::Char('h') => {
                        launcher.launch_heart(&mut show, HEART_SHELLS);
                    }
                    KeyCode::Char('s') => {
                        launcher.stop(&mut scheduler);
                    }
                    _ => {}
                },
                Event::Resize(cols, rows) => {
                    canvas.resize(cols, rows);
                    launcher.set_bounds(canvas.width(), canvas.height());
                    execute!(stdout, Clear(ClearType::All))?;
                    info!(cols, rows, "terminal resized");
                }
                _ => {}
            }
        }

        let now = Instant::now();
        for action in scheduler.advance(now.duration_since(last_frame)) {
            launcher.handle(action, &mut show, &mut scheduler);
        }
        last_frame = now;

        let (width, height) = (canvas.width(), canvas.height());
        canvas.fill_rect(0.0, 0.0, width, height, trail);
        show.tick(canvas);
        canvas.present(stdout)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }
}

/// Runs the show against a recording surface on a simulated clock.
fn run_headless(config: &Config, ticks: u64) -> Result<()> {
    let (width, height) = HEADLESS_SIZE;
    let mut surface = RecordingSurface::new(width, height);
    let mut show = Show::new(rng::from_seed(config.seed), config.heart);
    let mut scheduler = Scheduler::new();
    let mut launcher = Launcher::new(config.launch_policy(), width, height);
    if let Some(action) = config.mode.action() {
        scheduler.schedule_once(config.start_delay(), action);
    }

    let trail = Rgba::new(config.background(), config.trail_alpha);
    let frame_duration = config.frame_duration();
    let mut peak_fireworks = 0;
    let mut peak_particles = 0;
    let mut draw_calls = 0;

    for _ in 0..ticks {
        for action in scheduler.advance(frame_duration) {
            launcher.handle(action, &mut show, &mut scheduler);
        }
        surface.fill_rect(0.0, 0.0, width, height, trail);
        show.tick(&mut surface);

        draw_calls += surface.take_commands().len();
        peak_fireworks = peak_fireworks.max(show.len());
        peak_particles = peak_particles.max(show.particle_count());
    }

    let mut out = stdout().lock();
    writeln!(out, "ticks:           {ticks}")?;
    writeln!(out, "simulated time:  {:.2}s", scheduler.now().as_secs_f32())?;
    writeln!(out, "active now:      {}", show.len())?;
    writeln!(out, "peak fireworks:  {peak_fireworks}")?;
    writeln!(out, "peak particles:  {peak_particles}")?;
    writeln!(out, "draw calls:      {draw_calls}")?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let result = parse_args(&args).and_then(|cli| {
        if cli.help {
            print_usage();
            return Ok(());
        }
        let config = load_config(&cli)?;
        init_logging(&config)?;
        match cli.headless {
            Some(ticks) => run_headless(&config, ticks),
            None => run_terminal(&config),
        }
    });

    if let Err(err) = result {
        eprintln!("fireworks: {err}");
        if matches!(err, Error::InvalidArgument(_)) {
            eprintln!();
            print_usage();
        }
        std::process::exit(1);
    }
}

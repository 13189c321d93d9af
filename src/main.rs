mod app;
mod braille;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dla_accretion::{AppConfig, ConfigError, EngineSettings};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dla-accretion")]
#[command(about = "Grow a Diffusion-Limited Aggregation tree in the terminal")]
struct Args {
    /// Boundary profile (compact, fit-height)
    #[arg(long)]
    profile: Option<String>,

    /// Surface width in pixels (16-4096)
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels (16-4096)
    #[arg(long)]
    height: Option<u32>,

    /// Random seed for a reproducible tree
    #[arg(long)]
    seed: Option<u64>,

    /// Particles attempted per frame (1-50)
    #[arg(long)]
    speed: Option<usize>,

    /// Milliseconds between frames (1-1000)
    #[arg(long = "frame-ms")]
    frame_ms: Option<u64>,

    /// Draw the boundary circle
    #[arg(long = "show-boundary")]
    show_boundary: bool,

    /// Load configuration from this JSON file instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this file and exit
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Append logs to this file (filter with RUST_LOG)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// The terminal owns stdout, so logs only go to a file when asked for
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {}", e))?;
    Ok(())
}

/// Config file first, then command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default()?,
    };

    // A profile only picks the boundary layout; other tunables stay as configured
    if let Some(name) = &args.profile {
        let profile =
            EngineSettings::profile(name).ok_or_else(|| ConfigError::UnknownProfile(name.clone()))?;
        config.settings.sizing = profile.sizing;
    }
    if let Some(width) = args.width {
        config.surface_width = width;
    }
    if let Some(height) = args.height {
        config.surface_height = height;
    }
    config.clamp_surface();
    if let Some(speed) = args.speed {
        config.settings.iterations_per_frame = speed.clamp(1, 50);
    }
    if let Some(frame_ms) = args.frame_ms {
        config.frame_millis = frame_ms.clamp(1, 1000);
    }
    if args.show_boundary {
        config.show_boundary = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let config = resolve_config(&args)?;

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        println!("Saved configuration to {}", path.display());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, args.seed);
    app.engine.start();
    info!(
        width = config.surface_width,
        height = config.surface_height,
        "Viewer started"
    );

    let res = run_app(&mut terminal, &mut app, Duration::from_millis(config.frame_millis));

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(%err, "Viewer exited with an error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    frame_duration: Duration,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(frame_duration)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(' ') => app.toggle_running(),
                    KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('g') | KeyCode::Char('G') => {
                        app.regenerate()
                    }
                    KeyCode::Char('b') | KeyCode::Char('B') => app.toggle_boundary(),
                    KeyCode::Char('+') | KeyCode::Char('=') => app.increase_speed(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.decrease_speed(),
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    KeyCode::Char('h') | KeyCode::Char('H') => app.toggle_help(),
                    KeyCode::Esc if app.show_help => app.toggle_help(),
                    KeyCode::Char('j') | KeyCode::Char('J') if app.show_help => {
                        app.scroll_help_down(ui::HELP_CONTENT_LINES)
                    }
                    KeyCode::Char('k') | KeyCode::Char('K') if app.show_help => app.scroll_help_up(),
                    _ => {}
                }
            }
        }

        // One batch per redraw
        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dla_accretion::Sizing;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["dla-accretion", "--config", "/nonexistent/dla-accretion.json"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        assert!(resolve_config(&args(&[])).is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        AppConfig::default().save_to_file(file.path()).unwrap();
        let path = file.path().to_str().unwrap();

        let parsed = Args::parse_from([
            "dla-accretion",
            "--config",
            path,
            "--profile",
            "fit-height",
            "--width",
            "2",
            "--speed",
            "99",
            "--show-boundary",
        ]);
        let config = resolve_config(&parsed).unwrap();

        assert!(matches!(config.settings.sizing, Sizing::FitHeight { .. }));
        assert_eq!(config.surface_width, 16);
        assert_eq!(config.surface_height, 250);
        assert_eq!(config.settings.iterations_per_frame, 50);
        assert!(config.show_boundary);
    }

    #[test]
    fn test_profile_keeps_configured_tunables() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut saved = AppConfig::default();
        saved.settings.spawn_margin = 7.0;
        saved.settings.max_particles_estimate = 900;
        saved.settings.palette.bands[0] = dla_accretion::Rgb::new(0x10, 0x20, 0x30);
        saved.save_to_file(file.path()).unwrap();

        let parsed = Args::parse_from([
            "dla-accretion",
            "--config",
            file.path().to_str().unwrap(),
            "--profile",
            "fit-height",
        ]);
        let config = resolve_config(&parsed).unwrap();

        assert_eq!(config.settings.sizing, EngineSettings::fit_height().sizing);
        assert_eq!(config.settings.spawn_margin, 7.0);
        assert_eq!(config.settings.max_particles_estimate, 900);
        assert_eq!(config.settings.palette, saved.settings.palette);
    }

    #[test]
    fn test_second_subscriber_install_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dla-accretion.log");

        // Whichever call installs the global subscriber, the next one must fail
        let _ = init_tracing(Some(&path));
        assert!(path.exists());
        let err = init_tracing(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("installing log subscriber"));
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        AppConfig::default().save_to_file(file.path()).unwrap();
        let parsed = Args::parse_from([
            "dla-accretion",
            "--config",
            file.path().to_str().unwrap(),
            "--profile",
            "hexagon",
        ]);
        let err = resolve_config(&parsed).unwrap_err();
        assert!(err.to_string().contains("hexagon"));
    }
}

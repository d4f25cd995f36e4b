use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use kashi::config::LyricsConfig;
use kashi::layout::MeasureRequest;
use kashi::scroll::ScrollSource;
use kashi::ui::{self, LyricsView, Measurement};

/// Kashi - synced lyrics in your terminal 🎤
#[derive(Parser, Debug)]
#[command(name = "kashi", version, about)]
struct Args {
    /// Path to an .lrc file
    lrc: PathBuf,

    /// Print the parsed lines as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Disable playback-driven auto-scroll
    #[arg(long)]
    no_auto_scroll: bool,

    /// Playback speed multiplier for the demo clock
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
}

fn init_logging() -> Result<()> {
    // The terminal belongs to the UI, so logs go to a file
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kashi");
    std::fs::create_dir_all(&dir)?;
    tracing_subscriber::fmt()
        .with_writer(tracing_appender::rolling::never(dir, "kashi.log"))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.lrc)
        .with_context(|| format!("reading {}", args.lrc.display()))?;

    if args.dump {
        let lines = kashi::lrc::parse(&text);
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    init_logging()?;

    let mut config = LyricsConfig::load();
    if args.no_auto_scroll {
        config.auto_scroll = false;
    }

    let mut view = LyricsView::new(config);
    view.on_line_change(|index, line| {
        tracing::debug!(?index, text = line.map(|l| l.text.as_str()), "active line changed");
    });
    view.set_lyrics(&text);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut view, args.speed).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view: &mut LyricsView,
    speed: f64,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    let started = Instant::now();

    // Geometry from the previous frame, applied one tick later
    let mut pending: Option<(MeasureRequest, Measurement)> = None;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let now = Instant::now();

                if let Some((request, measured)) = pending.take() {
                    if let Some(cmd) = view.apply_measure(request, measured.container, &measured.line_tops, now) {
                        view.handle_scroll(ScrollSource::Auto, cmd.offset, now);
                    }
                }

                let position_ms = (started.elapsed().as_millis() as f64 * speed) as i64;
                if let Some(cmd) = view.sync(position_ms, now) {
                    // Echo back as programmatic so it never suppresses
                    view.handle_scroll(ScrollSource::Auto, cmd.offset, now);
                }

                let request = view.begin_measure();
                let mut measured = None;
                terminal.draw(|f| {
                    let area = f.area();
                    measured = Some(ui::render(f, area, view));
                })?;
                pending = measured.map(|m| (request, m));
            }
            Some(event) = events.next() => {
                let now = Instant::now();
                match event? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                            KeyCode::Char('j') | KeyCode::Down => {
                                view.handle_scroll(ScrollSource::User, view.scroll_offset() + 1.0, now);
                            }
                            KeyCode::Char('k') | KeyCode::Up => {
                                view.handle_scroll(ScrollSource::User, view.scroll_offset() - 1.0, now);
                            }
                            KeyCode::Enter | KeyCode::Char('g') => {
                                let cmd = view.scroll_to_current_line();
                                view.handle_scroll(ScrollSource::Auto, cmd.offset, now);
                            }
                            _ => {}
                        }
                    }
                    Event::Resize(_, _) => view.invalidate_layout(),
                    _ => {}
                }
            }
        }
    }
}

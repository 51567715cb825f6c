//! Terminal host and entry point.
//!
//! This module is the thin integration layer between the nestview library and
//! a real terminal. It parses the command line, loads the document, and runs
//! the event loop on top of crossterm.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        UI thread (Host)      │
//! │  ┌────────────────────────┐  │
//! │  │  AppState (library)    │  │  ← state, event handling
//! │  └────────────────────────┘  │
//! │     ▲ poll        ▲ take_due │
//! │     │             │          │
//! │  crossterm    Scheduler      │  ← keys, resizes, timers
//! └──────────────────────────────┘
//!           ▲ try_recv
//!           │ one-shot channel
//! ┌──────────────────────────────┐
//! │  --exec thread               │  ← external operation
//! └──────────────────────────────┘
//! ```
//!
//! # Loop
//!
//! 1. **Input**: wait for a terminal event, at most until the next timer is due
//! 2. **Completion**: poll the status view's receiver without blocking
//! 3. **Timers**: deliver scheduled events whose deadline has passed
//! 4. **Actions**: execute quit, schedule, copy and open-URL requests
//! 5. **Render**: redraw the frame when something changed
//!
//! Input is handled first, so a quit key always wins over an operation that
//! finishes in the same iteration. A completion is polled before due timers,
//! so an outcome that arrived before the deadline is never lost to it.

#![allow(clippy::multiple_crate_versions)]

use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::process::{Command, ExitCode, Stdio};
use std::time::{Duration, Instant};

use base64::Engine as _;
use clap::Parser;
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style};

use nestview::domain::{load_document, Key};
use nestview::path::ROOT;
use nestview::worker::{completion_channel, spawn_command, Scheduler};
use nestview::{handle_event, Action, AppState, Config, Event, KeyMode, NestviewError};

/// Upper bound on how long the loop sleeps waiting for input.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Browse nested JSON and TOML data in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data file (.json or .toml). Reads JSON from stdin when absent or `-`.
    file: Option<PathBuf>,

    /// View schema file
    #[arg(long, value_name = "FILE")]
    schema: Option<String>,

    /// Initial path, e.g. `_.items[0]`
    #[arg(long, value_name = "EXPR")]
    path: Option<String>,

    /// Key bindings: vim, emacs or function
    #[arg(long, value_name = "MODE")]
    key_mode: Option<KeyMode>,

    /// Built-in theme name
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// TOML theme file
    #[arg(long, value_name = "FILE")]
    theme_file: Option<String>,

    /// Function catalog replacing the built-in one
    #[arg(long, value_name = "FILE")]
    catalog: Option<String>,

    /// Disable color output
    #[arg(long)]
    no_color: bool,

    /// Trace level for the OpenTelemetry trace file
    #[arg(long, value_name = "LEVEL")]
    trace_level: Option<String>,

    /// Configuration file (default: <config_dir>/nestview/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Shell command whose completion drives the status view
    #[arg(long, value_name = "COMMAND")]
    exec: Option<String>,
}

impl Cli {
    /// Layers command-line values over the file configuration.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.key_mode {
            config.key_mode = mode;
        }
        if self.theme.is_some() {
            config.theme.clone_from(&self.theme);
        }
        if self.theme_file.is_some() {
            config.theme_file.clone_from(&self.theme_file);
        }
        if self.catalog.is_some() {
            config.catalog.clone_from(&self.catalog);
        }
        if self.schema.is_some() {
            config.schema.clone_from(&self.schema);
        }
        if self.trace_level.is_some() {
            config.trace_level.clone_from(&self.trace_level);
        }
        config.no_color |= self.no_color;
        config
    }
}

/// Puts the terminal in raw mode on the alternate screen and restores it on drop.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Event loop state: the library's `AppState` plus the host's timers.
struct Host {
    app: AppState,
    scheduler: Scheduler<Event>,
    terminal: TerminalGuard,
    dirty: bool,
}

impl Host {
    fn run(&mut self) -> io::Result<()> {
        while !self.app.quitting {
            if self.dirty {
                self.draw()?;
                self.dirty = false;
            }

            let now = Instant::now();
            let timeout = self.scheduler.next_in(now).map_or(POLL_INTERVAL, |d| d.min(POLL_INTERVAL));
            if event::poll(timeout)? {
                if let Some(event) = Self::map_terminal_event(&event::read()?) {
                    self.update(&event);
                }
            }

            if let Some(event) = self.app.poll_completion() {
                self.update(&event);
            }
            for event in self.scheduler.take_due(Instant::now()) {
                self.update(&event);
            }
        }
        Ok(())
    }

    /// Feeds one event through the library and executes the resulting actions.
    fn update(&mut self, event: &Event) {
        let event_name = Self::event_name(event);
        let span = tracing::debug_span!("host_update", event_type = %event_name);
        let _guard = span.entered();

        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in actions {
                    self.execute_action(action);
                }
                self.dirty |= should_render;
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                let clear = self.app.set_flash(e.to_string(), true);
                self.execute_action(clear);
                self.dirty = true;
            }
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let frame = nestview::ui::render(&self.app, self.app.height, self.app.width);
        let out = &mut self.terminal.stdout;
        for (row, line) in frame.lines().enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(out, cursor::MoveTo(0, row), style::Print(line), terminal::Clear(ClearType::UntilNewLine))?;
        }
        queue!(out, terminal::Clear(ClearType::FromCursorDown))?;
        out.flush()
    }

    /// Executes an action returned from event handling.
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                tracing::debug!("quit requested");
                self.app.quitting = true;
            }
            Action::Schedule { after, event } => {
                self.scheduler.schedule(Instant::now(), after, event);
            }
            Action::Copy(text) => {
                if let Err(e) = self.copy_to_clipboard(&text) {
                    tracing::warn!(error = %e, "clipboard write failed");
                }
            }
            Action::OpenUrl(url) => {
                if let Err(e) = open_url(&url) {
                    tracing::warn!(%url, error = %e, "failed to open url");
                }
            }
        }
    }

    /// Copies through the terminal with an OSC 52 sequence, which also works
    /// over SSH.
    fn copy_to_clipboard(&mut self, text: &str) -> io::Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        let out = &mut self.terminal.stdout;
        write!(out, "\x1b]52;c;{encoded}\x07")?;
        out.flush()
    }

    fn map_terminal_event(event: &event::Event) -> Option<Event> {
        match event {
            event::Event::Key(key) => map_key_event(key).map(Event::Key),
            event::Event::Resize(cols, rows) => Some(Event::Resize {
                width: usize::from(*cols),
                height: usize::from(*rows),
            }),
            _ => None,
        }
    }

    /// Gets a string name for an event for logging purposes.
    fn event_name(event: &Event) -> String {
        match event {
            Event::Key(key) => format!("Key({key:?})"),
            Event::Resize { .. } => "Resize".to_string(),
            Event::View(_) => "View".to_string(),
            Event::FlashClear { .. } => "FlashClear".to_string(),
        }
    }
}

/// Maps a crossterm key press to a [`Key`]. Releases and repeats of
/// unsupported keys map to `None`.
fn map_key_event(key: &KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    Some(match key.code {
        KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(c) if alt => Key::Alt(c),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::F(n) => Key::F(n),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        _ => return None,
    })
}

fn open_url(url: &str) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };
    command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(drop)
}

fn run(cli: &Cli) -> nestview::Result<()> {
    let config = cli.apply(Config::load(cli.config.as_deref())?.with_env());
    let tracing_enabled = nestview::observability::init_tracing(config.trace_level(), &nestview::infrastructure::data_dir());

    let span = tracing::info_span!("nestview_session", tracing_enabled);
    let _guard = span.entered();

    let root = load_document(cli.file.as_deref())?;
    let (cols, rows) = terminal::size()?;
    let mut app = nestview::initialize(&config, root)?.with_size(usize::from(cols), usize::from(rows));

    if let Some(command_line) = &cli.exec {
        let (sender, receiver) = completion_channel();
        spawn_command(command_line.clone(), sender)?;
        app = app.with_operation(receiver);
        tracing::debug!(command = %command_line, "operation started");
    }

    let mut scheduler = Scheduler::new();
    for action in app.start(cli.path.as_deref().unwrap_or(ROOT)) {
        if let Action::Schedule { after, event } = action {
            scheduler.schedule(Instant::now(), after, event);
        }
    }

    let mut host = Host {
        app,
        scheduler,
        terminal: TerminalGuard::enter()?,
        dirty: true,
    };
    host.run()?;
    drop(host);

    tracing::debug!("session ended");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("nestview: {e}");
            match e {
                NestviewError::Config(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn maps_modified_keys() {
        assert_eq!(map_key_event(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Key::Ctrl('c')));
        assert_eq!(map_key_event(&press(KeyCode::Char('<'), KeyModifiers::ALT)), Some(Key::Alt('<')));
        assert_eq!(map_key_event(&press(KeyCode::Char('G'), KeyModifiers::SHIFT)), Some(Key::Char('G')));
        assert_eq!(map_key_event(&press(KeyCode::Tab, KeyModifiers::SHIFT)), Some(Key::BackTab));
        assert_eq!(map_key_event(&press(KeyCode::F(7), KeyModifiers::NONE)), Some(Key::F(7)));
        assert_eq!(map_key_event(&press(KeyCode::Insert, KeyModifiers::NONE)), None);
    }

    #[test]
    fn ignores_key_release() {
        let mut key = press(KeyCode::Char('j'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key_event(&key), None);
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from(["nestview", "data.json", "--key-mode", "emacs", "--theme", "plain", "--no-color"]);
        let config = cli.apply(Config {
            theme: Some("dark".into()),
            trace_level: Some("debug".into()),
            ..Config::default()
        });
        assert_eq!(config.key_mode, KeyMode::Emacs);
        assert_eq!(config.theme.as_deref(), Some("plain"));
        assert_eq!(config.trace_level(), "debug");
        assert!(config.no_color);
        assert_eq!(cli.file, Some(PathBuf::from("data.json")));
    }
}

//! Elm Architecture runtime.
//!
//! A [`Model`] owns all UI state. Terminal input and command results arrive
//! as messages; `update` applies them one at a time and may return a [`Cmd`]
//! describing side effects. Commands run on worker threads and report back by
//! sending a message over a channel, so the event loop never blocks on IO.
//!
//! [`Simulator`] drives the same model without a terminal, running commands
//! synchronously, which is what the tests use.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::Print,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use thiserror::Error;

use crate::keys::{Key, from_crossterm_key};

/// Errors raised while driving the terminal.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Terminal setup, polling or rendering failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Input delivered by the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    /// A key press.
    Key(Key),
    /// The terminal was resized (or the initial size is known).
    Resize { width: u16, height: u16 },
}

/// The application model.
pub trait Model {
    /// Message type the model reacts to.
    type Msg: From<TermEvent> + Send + 'static;

    /// Called once before the first render.
    fn init(&mut self) -> Option<Cmd<Self::Msg>>;

    /// Apply one message.
    fn update(&mut self, msg: Self::Msg) -> Option<Cmd<Self::Msg>>;

    /// Render the whole screen. Lines are separated by `\n`.
    fn view(&self) -> String;
}

/// A side effect requested by `init` or `update`.
pub enum Cmd<M> {
    /// Run a blocking task off the event loop; its result is fed back.
    Task(Box<dyn FnOnce() -> M + Send + 'static>),
    /// Run several commands with no ordering guarantee between them.
    Batch(Vec<Cmd<M>>),
    /// Stop the program.
    Quit,
}

impl<M> Cmd<M> {
    /// Wrap a blocking closure.
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(Box::new(f))
    }

    /// Run the command on the current thread, collecting produced messages.
    ///
    /// `Quit` produces nothing.
    pub fn run_sync(self) -> Vec<M> {
        let mut out = Vec::new();
        self.run_sync_into(&mut out);
        out
    }

    fn run_sync_into(self, out: &mut Vec<M>) {
        match self {
            Self::Task(f) => out.push(f()),
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.run_sync_into(out);
                }
            }
            Self::Quit => {}
        }
    }

    /// Whether running this command would stop the program.
    #[must_use]
    pub fn is_quit(&self) -> bool {
        match self {
            Self::Quit => true,
            Self::Batch(cmds) => cmds.iter().any(Self::is_quit),
            Self::Task(_) => false,
        }
    }
}

impl<M> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task(_) => f.write_str("Cmd::Task(..)"),
            Self::Batch(cmds) => f.debug_tuple("Cmd::Batch").field(cmds).finish(),
            Self::Quit => f.write_str("Cmd::Quit"),
        }
    }
}

/// Combine optional commands, dropping the `None`s.
#[must_use]
pub fn batch<M>(cmds: Vec<Option<Cmd<M>>>) -> Option<Cmd<M>> {
    let mut cmds: Vec<Cmd<M>> = cmds.into_iter().flatten().collect();
    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(Cmd::Batch(cmds)),
    }
}

/// Program options.
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Use the alternate screen buffer.
    pub alt_screen: bool,
    /// Maximum redraws per second.
    pub fps: u32,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            alt_screen: false,
            fps: 30,
        }
    }
}

/// Runs a [`Model`] against the real terminal.
pub struct Program<M: Model> {
    model: M,
    options: ProgramOptions,
}

impl<M: Model> Program<M> {
    /// Create a program for `model` with default options.
    pub fn new(model: M) -> Self {
        Self {
            model,
            options: ProgramOptions::default(),
        }
    }

    /// Render into the alternate screen buffer.
    #[must_use]
    pub const fn with_alt_screen(mut self) -> Self {
        self.options.alt_screen = true;
        self
    }

    /// Run until the model asks to quit, returning the final model.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Io`] if the terminal cannot be set up, polled
    /// or written to. The terminal is restored either way.
    pub fn run(self) -> Result<M> {
        let mut stdout = io::stdout();
        let _guard = TerminalGuard::enter(&mut stdout, self.options.alt_screen)?;
        self.event_loop(&mut stdout)
    }

    fn event_loop<W: Write>(mut self, writer: &mut W) -> Result<M> {
        let (tx, rx): (Sender<M::Msg>, Receiver<M::Msg>) = mpsc::channel();

        let (width, height) = terminal::size()?;
        let _ = tx.send(TermEvent::Resize { width, height }.into());

        if let Some(cmd) = self.model.init() {
            if dispatch(cmd, &tx).is_break() {
                return Ok(self.model);
            }
        }

        let mut last_view = String::new();
        render(writer, &self.model.view(), &mut last_view)?;

        let frame = Duration::from_secs_f64(1.0 / f64::from(self.options.fps));

        loop {
            if event::poll(frame)? {
                match event::read()? {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        if let Some(key) = from_crossterm_key(key_event) {
                            let _ = tx.send(TermEvent::Key(key).into());
                        }
                    }
                    Event::Resize(width, height) => {
                        let _ = tx.send(TermEvent::Resize { width, height }.into());
                        last_view.clear();
                    }
                    _ => {}
                }
            }

            let mut dirty = false;
            while let Ok(msg) = rx.try_recv() {
                if let Some(cmd) = self.model.update(msg) {
                    if dispatch(cmd, &tx).is_break() {
                        return Ok(self.model);
                    }
                }
                dirty = true;
            }

            if dirty {
                render(writer, &self.model.view(), &mut last_view)?;
            }
        }
    }
}

/// Start a command. Tasks get their own thread.
fn dispatch<M: Send + 'static>(cmd: Cmd<M>, tx: &Sender<M>) -> ControlFlow<()> {
    match cmd {
        Cmd::Quit => ControlFlow::Break(()),
        Cmd::Task(f) => {
            let tx = tx.clone();
            thread::spawn(move || {
                let _ = tx.send(f());
            });
            ControlFlow::Continue(())
        }
        Cmd::Batch(cmds) => {
            for cmd in cmds {
                dispatch(cmd, tx)?;
            }
            ControlFlow::Continue(())
        }
    }
}

fn render<W: Write>(writer: &mut W, view: &str, last_view: &mut String) -> Result<()> {
    if view == last_view.as_str() {
        return Ok(());
    }

    queue!(writer, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in view.lines().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(writer, MoveTo(0, row), Print(line))?;
    }
    writer.flush()?;

    view.clone_into(last_view);
    Ok(())
}

/// Puts the terminal into raw mode and restores it on drop.
struct TerminalGuard {
    alt_screen: bool,
}

impl TerminalGuard {
    fn enter<W: Write>(writer: &mut W, alt_screen: bool) -> Result<Self> {
        enable_raw_mode()?;
        let guard = Self { alt_screen };
        if alt_screen {
            execute!(writer, EnterAlternateScreen)?;
        }
        execute!(writer, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, Show);
        if self.alt_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = disable_raw_mode();
    }
}

/// Drives a [`Model`] without a terminal.
///
/// Commands run synchronously on the calling thread and their messages are
/// queued, so a test can send input and then inspect the settled model.
pub struct Simulator<M: Model> {
    model: M,
    queue: VecDeque<M::Msg>,
    initialized: bool,
    quit: bool,
    updates: usize,
}

impl<M: Model> Simulator<M> {
    /// Wrap `model`.
    pub fn new(model: M) -> Self {
        Self {
            model,
            queue: VecDeque::new(),
            initialized: false,
            quit: false,
            updates: 0,
        }
    }

    /// Deliver an initial size, call `init`, and settle.
    pub fn init(&mut self, width: u16, height: u16) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.queue
            .push_back(TermEvent::Resize { width, height }.into());
        if let Some(cmd) = self.model.init() {
            self.run_cmd(cmd);
        }
        self.settle();
    }

    /// Queue a message and settle.
    pub fn send(&mut self, msg: M::Msg) {
        self.queue.push_back(msg);
        self.settle();
    }

    /// Press a key and settle.
    pub fn press(&mut self, key: Key) {
        self.send(TermEvent::Key(key).into());
    }

    /// Type each character of `text` as a separate key press.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(Key::Char(c));
        }
    }

    /// Process queued messages, and the messages their commands produce,
    /// until nothing is left or quit is requested.
    pub fn settle(&mut self) {
        while !self.quit {
            let Some(msg) = self.queue.pop_front() else {
                break;
            };
            self.updates += 1;
            if let Some(cmd) = self.model.update(msg) {
                self.run_cmd(cmd);
            }
        }
    }

    fn run_cmd(&mut self, cmd: Cmd<M::Msg>) {
        if cmd.is_quit() {
            self.quit = true;
            return;
        }
        self.queue.extend(cmd.run_sync());
    }

    /// The current model.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Render the current view.
    pub fn view(&self) -> String {
        self.model.view()
    }

    /// Whether a `Quit` command was produced.
    pub const fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Number of `update` calls so far.
    pub const fn update_count(&self) -> usize {
        self.updates
    }
}

// src/status.rs

use std::{
    io::{self, Write},
    sync::Mutex,
};

use tracing::warn;

/// Message shown before anything has been fetched.
pub const DEFAULT_STATUS: &str = "click the button to retrieve data";

/// The one user-facing message. Owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText(String);

impl Default for StatusText {
    fn default() -> Self {
        Self(DEFAULT_STATUS.to_string())
    }
}

impl StatusText {
    /// Replace the held text. Nothing is drawn.
    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn records_fetched(n: usize) -> String {
        format!("you got {} records", n)
    }
}

/// Somewhere a status line can be shown. Each `show` replaces what was there.
pub trait Surface: Send + Sync {
    fn show(&self, text: &str);
}

/// Keeps the last shown text in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    contents: Mutex<String>,
    draws: Mutex<usize>,
}

impl MemorySurface {
    pub fn contents(&self) -> String {
        self.contents.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// How many times `show` was called.
    pub fn draws(&self) -> usize {
        self.draws.lock().map(|d| *d).unwrap_or_default()
    }
}

impl Surface for MemorySurface {
    fn show(&self, text: &str) {
        if let Ok(mut c) = self.contents.lock() {
            c.clear();
            c.push_str(text);
        }
        if let Ok(mut d) = self.draws.lock() {
            *d += 1;
        }
    }
}

/// Status line on a terminal writer. Redraws only when the text changes.
pub struct TerminalSurface<W: Write + Send> {
    out: Mutex<W>,
    last: Mutex<Option<String>>,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            last: Mutex::new(None),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Surface for TerminalSurface<W> {
    fn show(&self, text: &str) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if last.as_deref() == Some(text) {
            return;
        }
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        match writeln!(out, "status: {}", text).and_then(|_| out.flush()) {
            Ok(()) => *last = Some(text.to_string()),
            Err(e) => warn!(error = %e, "could not draw status line"),
        }
    }
}

/// Draws a [`StatusText`] onto a [`Surface`].
pub struct StatusPresenter<S: Surface> {
    surface: S,
}

impl<S: Surface> StatusPresenter<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn render(&self, status: &StatusText) {
        self.surface.show(status.as_str());
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

// Console reporting
//
// Status lines for the batch are written straight to a writer (stdout in the
// binary) with ANSI colors. Tracing output goes elsewhere so the two never
// interleave on stdout.

use serde::{Deserialize, Serialize};
use std::io::{self, IsTerminal, Write};

const RESET: &str = "\x1b[0m";

/// ANSI foreground colors used by the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
        }
    }
}

/// When to emit ANSI escape codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve the mode against the current stdout
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
            }
        }
    }
}

/// Colored status writer
///
/// Every method writes immediately and flushes, so a status line that is
/// left open (e.g. `"a.txt": `) is visible while the solver runs.
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<io::Stdout> {
    /// Console on stdout with the given color mode
    pub fn stdout(mode: ColorMode) -> Self {
        Self::new(io::stdout(), mode.enabled())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Wrap `text` in the color's escape codes (no-op without color)
    pub fn paint(&self, color: Color, text: impl AsRef<str>) -> String {
        if self.color {
            format!("\x1b[{}m{}{}", color.code(), text.as_ref(), RESET)
        } else {
            text.as_ref().to_string()
        }
    }

    /// Double-quote `text` and paint it yellow
    pub fn quote(&self, text: impl AsRef<str>) -> String {
        self.paint(Color::Yellow, format!("\"{}\"", text.as_ref()))
    }

    /// Write without a line terminator
    pub fn write(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        self.out.write_all(text.as_ref().as_bytes())?;
        self.out.flush()
    }

    /// Write and terminate the line
    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        self.out.write_all(text.as_ref().as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

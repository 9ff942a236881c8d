//! `TerminalReporter`: Presentation-layer implementation of `UserInterface`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::UserInterface`
//! trait so the push service and stream aggregator can display lines without
//! depending on any presentation type directly.

use std::io::Write as _;

use owo_colors::OwoColorize as _;

use crate::application::ports::UserInterface;
use crate::output::OutputContext;

/// Terminal line sink that wraps an `OutputContext`.
///
/// - `display_text()` prints `"  → {text}"` (suppressed when `ctx.quiet`)
/// - `display_warning()` prints `"  ⚠ {text}"` to stderr (suppressed when
///   `ctx.quiet`)
/// - `display_warnings()` prints one warning line per entry under a single
///   stderr lock, so a batch is never split by other output
///
/// Status lines go to stdout, or to stderr when stdout is reserved for a
/// JSON document.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    text_to_stderr: bool,
}

impl<'a> TerminalReporter<'a> {
    /// Create a reporter that prints status lines to stdout.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            text_to_stderr: false,
        }
    }

    /// Create a reporter that keeps stdout free for JSON output.
    #[must_use]
    pub fn for_json(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            text_to_stderr: true,
        }
    }
}

impl UserInterface for TerminalReporter<'_> {
    fn display_text(&self, text: &str) {
        if self.ctx.quiet {
            return;
        }
        let arrow = "→".style(self.ctx.styles.step);
        if self.text_to_stderr {
            eprintln!("  {arrow} {text}");
        } else {
            println!("  {arrow} {text}");
        }
    }

    fn display_warning(&self, text: &str) {
        self.display_warnings(&[text.to_string()]);
    }

    fn display_warnings(&self, warnings: &[String]) {
        if self.ctx.quiet || warnings.is_empty() {
            return;
        }
        let mut out = std::io::stderr().lock();
        for warning in warnings {
            // stderr write errors are ignored
            let _ = writeln!(out, "  {} {warning}", "⚠".style(self.ctx.styles.warning));
        }
        let _ = out.flush();
    }
}

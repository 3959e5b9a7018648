//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, OutputMode, ProgressSpinner, SpinnerHandle, Theme, UserInterface};

/// Terminal UI implementation.
///
/// Messages go to stdout, errors to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: Theme,
    mode: OutputMode,
    spinners: bool,
}

impl TerminalUI {
    /// Create a terminal UI.
    ///
    /// `spinners` is ANDed with the mode; pass `false` for CI logs.
    pub fn new(mode: OutputMode, spinners: bool) -> Self {
        let theme = if should_use_colors() {
            Theme::new()
        } else {
            Theme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
            spinners,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    // Final status lines are shown in quiet mode too.
    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_header(title)).ok();
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.spinners && self.mode.shows_spinners() && self.out.is_term() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(LineSpinner {
                out: self.out.clone(),
                theme: self.theme.clone(),
                show: self.mode.shows_status(),
            })
        }
    }
}

/// Spinner stand-in that prints one line per finished action.
struct LineSpinner {
    out: Term,
    theme: Theme,
    show: bool,
}

impl SpinnerHandle for LineSpinner {
    fn finish_success(&mut self, msg: &str) {
        if self.show {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn finish_error(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_error(msg)).ok();
    }
}

/// Create the UI for the current process.
pub fn create_ui(mode: OutputMode, ci: bool) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode, !ci))
}

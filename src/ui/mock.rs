//! Mock UI implementation for testing.
//!
//! `MockUI` implements [`UserInterface`] and captures every interaction
//! for later assertion.

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// How a mock spinner ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinnerOutcome {
    Running,
    Success(String),
    Error(String),
}

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<(String, Rc<RefCell<SpinnerOutcome>>)>,
}

impl MockUI {
    /// Create a MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Messages passed to `start_spinner`, in order.
    pub fn spinners(&self) -> Vec<String> {
        self.spinners.iter().map(|(msg, _)| msg.clone()).collect()
    }

    /// Final state of every spinner started so far.
    pub fn spinner_outcomes(&self) -> Vec<SpinnerOutcome> {
        self.spinners
            .iter()
            .map(|(_, outcome)| outcome.borrow().clone())
            .collect()
    }

    /// Check if any captured output line contains `needle`.
    pub fn has_output(&self, needle: &str) -> bool {
        self.messages
            .iter()
            .chain(&self.successes)
            .chain(&self.errors)
            .chain(&self.headers)
            .any(|line| line.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let outcome = Rc::new(RefCell::new(SpinnerOutcome::Running));
        self.spinners.push((message.to_string(), Rc::clone(&outcome)));
        Box::new(MockSpinner { outcome })
    }
}

/// Spinner handed out by [`MockUI`].
#[derive(Debug)]
pub struct MockSpinner {
    outcome: Rc<RefCell<SpinnerOutcome>>,
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        *self.outcome.borrow_mut() = SpinnerOutcome::Success(msg.to_string());
    }

    fn finish_error(&mut self, msg: &str) {
        *self.outcome.borrow_mut() = SpinnerOutcome::Error(msg.to_string());
    }
}

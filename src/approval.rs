//! Human approval for tool calls with side effects

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use colored::*;

/// What the operator is asked to approve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    /// Preview of the action: the file and find/replace text, or the command
    pub preview: String,
    /// Yes/no question put to the operator
    pub question: &'static str,
    /// Tool result text recorded when the operator declines
    pub cancelled_message: &'static str,
}

/// Decides whether a mutating tool call may run
pub trait Approver: Send + Sync {
    fn confirm(&self, request: &ApprovalRequest) -> bool;
}

impl<A: Approver + ?Sized> Approver for Arc<A> {
    fn confirm(&self, request: &ApprovalRequest) -> bool {
        (**self).confirm(request)
    }
}

/// `y` in any case approves; anything else declines
pub fn parse_answer(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Asks the operator on the terminal and blocks until a line is entered
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinApprover;

impl StdinApprover {
    /// Ask a single yes/no question. A read failure or EOF declines.
    pub fn ask(&self, question: &str) -> bool {
        print!("{} {} ", question.bold(), "(y/n):".dimmed());
        if let Err(e) = io::stdout().flush() {
            log::warn!("Failed to flush approval prompt: {}", e);
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) => {
                log::warn!("Approval input closed, declining");
                false
            }
            Ok(_) => parse_answer(&answer),
            Err(e) => {
                log::warn!("Failed to read approval answer: {}", e);
                false
            }
        }
    }
}

impl Approver for StdinApprover {
    fn confirm(&self, request: &ApprovalRequest) -> bool {
        println!("\n{}", request.preview);
        self.ask(request.question)
    }
}

/// Answers from a fixed script and records every request it was shown.
/// Once the script is exhausted it falls back to a default answer.
#[derive(Debug)]
pub struct ScriptedApprover {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    seen: Mutex<Vec<ApprovalRequest>>,
}

impl ScriptedApprover {
    pub fn new(answers: Vec<bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            fallback: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn approve_all() -> Self {
        Self {
            fallback: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn decline_all() -> Self {
        Self::new(Vec::new())
    }

    /// Requests shown so far, in order
    pub fn requests(&self) -> Vec<ApprovalRequest> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Approver for ScriptedApprover {
    fn confirm(&self, request: &ApprovalRequest) -> bool {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(self.fallback)
    }
}

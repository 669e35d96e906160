//! Session - the orchestration loop for one user task.
//!
//! Each round the full transcript and the tool catalogue go to the completion
//! service. Requested tool calls are then handled one at a time, in order, and
//! their results appended before the next round starts.

use std::collections::VecDeque;
use std::sync::Arc;

use colored::*;

use super::prompt::SYSTEM_PROMPT;
use crate::approval::Approver;
use crate::config::AgentConfig;
use crate::error::{RedError, Result};
use crate::llm::{CompletionRequest, LlmClient, Message, ToolCall};
use crate::tools::ToolDispatcher;
use crate::transcript::Transcript;

/// Where the orchestration loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next completion
    AwaitingModel,
    /// Working through the tool calls of the latest assistant turn
    DispatchingTools,
    /// Terminal
    Done,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The model replied without requesting tools
    Completed { answer: Option<String> },
    /// The transcript reached the message cap
    StepLimitReached { answer: Option<String> },
    /// The completion service failed; no progress is possible without it
    Aborted { reason: String },
}

impl SessionOutcome {
    pub fn answer(&self) -> Option<&str> {
        match self {
            SessionOutcome::Completed { answer } | SessionOutcome::StepLimitReached { answer } => answer.as_deref(),
            SessionOutcome::Aborted { .. } => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, SessionOutcome::Aborted { .. })
    }
}

/// Drives one task from the user's instruction to a final answer.
///
/// Owns its transcript; nothing is shared between sessions.
pub struct Session<L, A>
where
    L: LlmClient,
    A: Approver,
{
    llm: Arc<L>,
    dispatcher: ToolDispatcher<A>,
    transcript: Transcript,
    state: SessionState,
    pending: VecDeque<ToolCall>,
    max_messages: usize,
    outcome: Option<SessionOutcome>,
}

impl<L, A> Session<L, A>
where
    L: LlmClient,
    A: Approver,
{
    pub fn new(llm: Arc<L>, approver: A, config: &AgentConfig) -> Self {
        let system_prompt = config.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT);
        Self {
            llm,
            dispatcher: ToolDispatcher::new(approver),
            transcript: Transcript::new(system_prompt),
            state: SessionState::AwaitingModel,
            pending: VecDeque::new(),
            max_messages: config.max_messages,
            outcome: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn dispatcher(&self) -> &ToolDispatcher<A> {
        &self.dispatcher
    }

    /// Run the task until the model is done, the cap is hit, or the
    /// completion service fails. A session runs exactly one task.
    pub async fn run(&mut self, task: &str) -> Result<SessionOutcome> {
        let task = task.trim();
        if task.is_empty() {
            return Err(RedError::InvalidInput("task is empty".to_string()));
        }
        if self.state == SessionState::Done || self.transcript.len() > 1 {
            return Err(RedError::InvalidState("session already ran a task".to_string()));
        }

        log::info!("Starting session with {} (cap {} messages)", self.llm.model(), self.max_messages);
        self.transcript.append(Message::user(task));

        while self.state != SessionState::Done {
            self.state = match self.state {
                SessionState::AwaitingModel => self.await_model().await,
                SessionState::DispatchingTools => self.dispatch_tools().await,
                SessionState::Done => SessionState::Done,
            };
        }

        let outcome = self.outcome.clone().unwrap_or(SessionOutcome::Completed {
            answer: self.final_answer(),
        });
        self.print_final(&outcome);
        Ok(outcome)
    }

    async fn await_model(&mut self) -> SessionState {
        if self.transcript.is_goal_achieved() {
            log::info!("Goal achieved after {} messages", self.transcript.len());
            let answer = self.final_answer();
            return self.finish(SessionOutcome::Completed { answer });
        }

        if self.transcript.len() >= self.max_messages {
            log::warn!("Message cap of {} reached, stopping", self.max_messages);
            let answer = self.final_answer();
            return self.finish(SessionOutcome::StepLimitReached { answer });
        }

        let step = self.transcript.len() - 1;
        println!("{}", format!("[Thinking... step {}]", step).dimmed());
        log::info!("Requesting completion, step {}", step);

        let request = CompletionRequest {
            messages: self.transcript.messages(),
            tools: self.dispatcher.definitions(),
            max_tokens: None,
        };

        match self.llm.complete(request).await {
            Ok(response) => {
                log::debug!(
                    "Reply: {} tool call(s), finish reason {:?}, {} tokens",
                    response.tool_calls.len(),
                    response.finish_reason,
                    response.usage.total()
                );
                let message = response.into_message();
                self.pending = message.tool_calls().iter().cloned().collect();
                self.transcript.append(message);

                if self.pending.is_empty() {
                    SessionState::AwaitingModel
                } else {
                    SessionState::DispatchingTools
                }
            }
            Err(e) => {
                log::error!("Completion request failed (retryable: {}): {}", e.is_retryable(), e);
                eprintln!("{} {}", "Error:".red().bold(), e);
                if e.is_retryable() {
                    eprintln!("{}", "The completion service may recover; run the task again later.".dimmed());
                }
                self.finish(SessionOutcome::Aborted { reason: e.to_string() })
            }
        }
    }

    async fn dispatch_tools(&mut self) -> SessionState {
        while let Some(call) = self.pending.pop_front() {
            if self.transcript.len() >= self.max_messages {
                log::warn!(
                    "Message cap of {} reached with {} tool call(s) left undispatched",
                    self.max_messages,
                    self.pending.len() + 1
                );
                self.pending.clear();
                return self.finish(SessionOutcome::StepLimitReached { answer: None });
            }

            let result = self.dispatcher.dispatch(&call).await;
            self.transcript.append(Message::tool(call.id, result.content));
        }

        SessionState::AwaitingModel
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionState {
        self.outcome = Some(outcome);
        SessionState::Done
    }

    fn final_answer(&self) -> Option<String> {
        self.transcript.final_answer().map(str::to_string)
    }

    fn print_final(&self, outcome: &SessionOutcome) {
        if let Some(answer) = outcome.answer() {
            let rule = "=".repeat(50);
            println!("\n{}", rule);
            println!("{} {}", "Assistant:".green().bold(), answer);
            println!("{}\n", rule);
        }
    }
}

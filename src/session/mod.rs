//! Interactive session: command parsing and the per-line state machine.
//!
//! Each line of input is either blank (ignored), a command, or a question
//! dispatched to the [`RagEngine`]. Only `exit` ends the session.

pub mod stats;

use crate::rag::RagEngine;
use crate::types::QueryResult;
use std::sync::Arc;
use tracing::debug;

pub use stats::SessionStats;

/// Session commands, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Stats,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "salir" | "exit" | "quit" => Some(Command::Exit),
            "ayuda" | "help" => Some(Command::Help),
            "stats" => Some(Command::Stats),
            _ => None,
        }
    }
}

/// What happened after feeding one line to the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Blank line.
    Ignored,
    Help,
    Stats(SessionStats),
    Answered(QueryResult),
    /// Generation failed; the result carries the apology and the error.
    Failed(QueryResult),
    /// Terminal. Stats are present only if at least one query was made.
    Exit { final_stats: Option<SessionStats> },
}

impl SessionEvent {
    pub fn is_exit(&self) -> bool {
        matches!(self, SessionEvent::Exit { .. })
    }
}

pub struct ChatSession {
    engine: Arc<RagEngine>,
    stats: SessionStats,
    finished: bool,
}

impl ChatSession {
    pub fn new(engine: Arc<RagEngine>) -> Self {
        Self {
            engine,
            stats: SessionStats::new(),
            finished: false,
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Process one line of user input.
    pub async fn handle_input(&mut self, input: &str) -> SessionEvent {
        let input = input.trim();
        if self.finished {
            return SessionEvent::Exit {
                final_stats: self.final_stats(),
            };
        }
        if input.is_empty() {
            return SessionEvent::Ignored;
        }

        match Command::parse(input) {
            Some(Command::Exit) => {
                self.finished = true;
                debug!(queries = self.stats.total_queries, "Session ended");
                SessionEvent::Exit {
                    final_stats: self.final_stats(),
                }
            }
            Some(Command::Help) => SessionEvent::Help,
            Some(Command::Stats) => SessionEvent::Stats(self.stats.clone()),
            None => {
                let result = self.engine.query(input, None, false).await;
                self.stats.record(&result);
                if result.is_success() {
                    SessionEvent::Answered(result)
                } else {
                    SessionEvent::Failed(result)
                }
            }
        }
    }

    fn final_stats(&self) -> Option<SessionStats> {
        self.stats.has_queries().then(|| self.stats.clone())
    }
}

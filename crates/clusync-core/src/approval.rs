// ── Approval gate ──
//
// Consulted before every mutating action. The mode is fixed for the
// whole run. Interactive answers come from a `Prompter` so the terminal
// stays outside the engine.

use strum::Display;
use tracing::warn;

use crate::error::CoreError;

/// Affirmative answers; anything else (including empty input) declines.
const AFFIRMATIVE: [&str; 4] = ["y", "Y", "yes", "Yes"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalMode {
    /// Every prompt is answered "yes" without interaction.
    Auto,
    /// Every prompt is put to the operator.
    Interactive,
}

/// Source of free-text answers to yes/no questions.
pub trait Prompter {
    fn ask(&mut self, question: &str) -> Result<String, CoreError>;
}

/// Whether `answer` is one of the exact affirmative tokens.
pub fn is_affirmative(answer: &str) -> bool {
    AFFIRMATIVE.contains(&answer)
}

pub struct ApprovalGate<P> {
    mode: ApprovalMode,
    prompter: P,
}

impl<P: Prompter> ApprovalGate<P> {
    pub fn new(mode: ApprovalMode, prompter: P) -> Self {
        Self { mode, prompter }
    }

    pub fn mode(&self) -> ApprovalMode {
        self.mode
    }

    /// Ask `question`; `Auto` approves without calling the prompter.
    ///
    /// A question that cannot be put (no terminal, closed input) declines.
    pub fn approve(&mut self, question: &str) -> Result<bool, CoreError> {
        match self.mode {
            ApprovalMode::Auto => Ok(true),
            ApprovalMode::Interactive => match self.prompter.ask(question) {
                Ok(answer) => Ok(is_affirmative(&answer)),
                Err(CoreError::Prompt { message }) => {
                    warn!(question, reason = %message, "no answer, declining");
                    Ok(false)
                }
                Err(e) => Err(e),
            },
        }
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }
}

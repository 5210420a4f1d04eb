//! Echo tokens.
//!
//! Every write the controller pushes to the text surface carries a token and
//! the exact text written. The next change notification is an echo if and
//! only if it carries that text; anything else invalidates the token.

use serde::{Deserialize, Serialize};

/// Monotonic id of a controller-issued write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EchoToken(pub u64);

#[derive(Debug, Default)]
pub struct EchoGuard {
    next: u64,
    pending: Option<(EchoToken, String)>,
}

impl EchoGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a write of `text`; replaces any unanswered earlier token.
    pub fn issue(&mut self, text: &str) -> EchoToken {
        self.next += 1;
        let token = EchoToken(self.next);
        self.pending = Some((token, text.to_string()));
        token
    }

    /// Consumes the pending token. True when `incoming` is the echo of it.
    pub fn is_echo(&mut self, incoming: &str) -> bool {
        match self.pending.take() {
            Some((token, expected)) if expected == incoming => {
                log::debug!("suppressed echo of write {token:?}");
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> Option<EchoToken> {
        self.pending.as_ref().map(|(t, _)| *t)
    }
}

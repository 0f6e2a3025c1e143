//! Command guard: a best-effort safety net over terminal input.
//!
//! Classifies one chunk of inbound text against two static, ordered pattern
//! sets. Blocked patterns match as substrings anywhere in the chunk; confirm
//! patterns match only as a prefix of the trimmed chunk.
//!
//! This is not a security boundary. It sees one chunk at a time with no
//! shell parsing, so anything typed keystroke by keystroke slips past it.

mod patterns;
mod verdict;

pub use patterns::{BlockedPattern, PatternSet, BLOCKED, CONFIRM};
pub use verdict::{Verdict, VerdictKind};

/// A read-only pattern set plus the classification logic over it.
#[derive(Debug, Clone, Default)]
pub struct CommandGuard {
    patterns: PatternSet,
}

impl CommandGuard {
    pub fn new(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Classify one input chunk. First match wins, blocked list first.
    pub fn classify(&self, chunk: &str) -> Verdict {
        for blocked in self.patterns.blocked() {
            if chunk.contains(blocked.needle.as_str()) {
                return Verdict::block(format!(
                    "Blocked for safety: {} (`{}`)",
                    blocked.label, blocked.needle
                ));
            }
        }

        let trimmed = chunk.trim();
        for prefix in self.patterns.confirm() {
            if trimmed.starts_with(prefix.as_str()) {
                return Verdict::confirm(format!("`{prefix}` is destructive and needs confirmation"));
            }
        }

        Verdict::allow()
    }
}

/// Classify against the built-in pattern sets.
pub fn classify(chunk: &str) -> Verdict {
    CommandGuard::default().classify(chunk)
}

/// Whether a chunk is long enough to be worth classifying.
///
/// A single keystroke is never a complete command, so chunks of at most one
/// character go straight through.
pub fn needs_inspection(chunk: &str) -> bool {
    chunk.chars().nth(1).is_some()
}

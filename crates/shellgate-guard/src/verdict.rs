/// Outcome of classifying one input chunk. Carries no identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub requires_confirmation: bool,
    pub reason: Option<String>,
}

/// The three shapes a [`Verdict`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictKind {
    Blocked,
    NeedsConfirmation,
    Allowed,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            requires_confirmation: false,
            reason: None,
        }
    }

    pub fn confirm(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            requires_confirmation: true,
            reason: Some(reason.into()),
        }
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            requires_confirmation: false,
            reason: Some(reason.into()),
        }
    }

    pub fn kind(&self) -> VerdictKind {
        match (self.allowed, self.requires_confirmation) {
            (false, _) => VerdictKind::Blocked,
            (true, true) => VerdictKind::NeedsConfirmation,
            (true, false) => VerdictKind::Allowed,
        }
    }
}

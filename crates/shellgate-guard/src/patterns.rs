//! Static pattern sets consulted by the guard.

/// Catastrophic command fragments, checked as substrings in this order.
///
/// Matching is plain substring search, so `dd` also catches words such as
/// `git add`. Those false positives are accepted.
pub const BLOCKED: &[(&str, &str)] = &[
    ("rm -rf /", "recursive delete from the filesystem root"),
    ("sudo rm", "privileged delete"),
    ("dd", "raw disk copy"),
    ("mkfs", "filesystem format"),
    (":(){ :|:& };:", "fork bomb"),
];

/// Destructive but legitimate command prefixes, checked in this order.
pub const CONFIRM: &[&str] = &["rm", "git push --force", "npm uninstall", "yarn remove"];

/// One blocked substring with the human-readable label shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedPattern {
    pub needle: String,
    pub label: String,
}

/// Ordered blocked and confirm lists. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    blocked: Vec<BlockedPattern>,
    confirm: Vec<String>,
}

impl PatternSet {
    /// The built-in lists followed by operator-supplied extras.
    ///
    /// Extras can only add entries; built-ins keep their position ahead of
    /// them. Blank extras are skipped.
    pub fn with_extras<B, C>(extra_blocked: B, extra_confirm: C) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut set = Self::default();
        set.blocked.extend(
            extra_blocked
                .into_iter()
                .map(Into::into)
                .filter(|needle: &String| !needle.trim().is_empty())
                .map(|needle| BlockedPattern {
                    needle,
                    label: "operator rule".to_string(),
                }),
        );
        set.confirm.extend(
            extra_confirm
                .into_iter()
                .map(Into::into)
                .filter(|prefix: &String| !prefix.trim().is_empty()),
        );
        set
    }

    pub fn blocked(&self) -> &[BlockedPattern] {
        &self.blocked
    }

    pub fn confirm(&self) -> &[String] {
        &self.confirm
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            blocked: BLOCKED
                .iter()
                .map(|(needle, label)| BlockedPattern {
                    needle: needle.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            confirm: CONFIRM.iter().map(|p| p.to_string()).collect(),
        }
    }
}

use std::fmt;

/// Speaker tag for one transcript section.
///
/// Only these three values are roles; any other heading text encountered in a
/// transcript is ordinary content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Matches a body line against the exact role-marker form `# <Role>`.
    ///
    /// Case-sensitive, no leading whitespace, no trailing content.
    #[must_use]
    pub fn from_marker(line: &str) -> Option<Self> {
        match line {
            "# User" => Some(Self::User),
            "# Assistant" => Some(Self::Assistant),
            "# System" => Some(Self::System),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::System => "System",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contiguous block of content attributed to one role.
///
/// Content is always trimmed; a turn never holds empty content. Turns are
/// immutable once appended to a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Builds a turn from raw text, trimming surrounding whitespace.
    ///
    /// Returns `None` when the trimmed content is empty.
    #[must_use]
    pub fn new(role: Role, content: &str) -> Option<Self> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            role,
            content: trimmed.to_string(),
        })
    }
}

/// Ordered dialogue history plus the optional session model identifier
/// captured from front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    model: Option<String>,
    turns: Vec<Turn>,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_model(model: Option<String>) -> Self {
        Self {
            model,
            turns: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Session model identifier recorded in front matter, when present.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Appends a trimmed turn, discarding it when empty after trimming.
    ///
    /// Returns the stored turn so the caller can persist exactly what was
    /// kept.
    pub fn append(&mut self, role: Role, content: &str) -> Option<&Turn> {
        let turn = Turn::new(role, content)?;
        self.turns.push(turn);
        self.turns.last()
    }

    pub fn append_user(&mut self, content: &str) -> Option<&Turn> {
        self.append(Role::User, content)
    }

    pub fn append_system(&mut self, content: &str) -> Option<&Turn> {
        self.append(Role::System, content)
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversation, Role, Turn};

    #[test]
    fn role_markers_match_exact_headings_only() {
        assert_eq!(Role::from_marker("# User"), Some(Role::User));
        assert_eq!(Role::from_marker("# Assistant"), Some(Role::Assistant));
        assert_eq!(Role::from_marker("# System"), Some(Role::System));

        assert_eq!(Role::from_marker("# user"), None);
        assert_eq!(Role::from_marker("# User "), None);
        assert_eq!(Role::from_marker(" # User"), None);
        assert_eq!(Role::from_marker("## User"), None);
        assert_eq!(Role::from_marker("# Narrator"), None);
    }

    #[test]
    fn turn_trims_content_and_rejects_empty() {
        let turn = Turn::new(Role::User, "  hi there \n").expect("non-empty turn");
        assert_eq!(turn.content, "hi there");

        assert_eq!(Turn::new(Role::User, "   \n\t "), None);
    }

    #[test]
    fn append_discards_whitespace_only_content() {
        let mut conversation = Conversation::new();
        assert!(conversation.append_user("  \n ").is_none());
        assert!(conversation.is_empty());

        let stored = conversation.append_user(" hello ").expect("stored turn");
        assert_eq!(stored.content, "hello");
        assert_eq!(conversation.turns().len(), 1);
    }
}

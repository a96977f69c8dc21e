use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const USER_PREFIX: &str = "[user]: ";
const AI_PREFIX: &str = "[ai]: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    User,
    Ai,
}

impl Role {
    fn prefix(&self) -> &'static str {
        match self {
            Self::User => USER_PREFIX,
            Self::Ai => AI_PREFIX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChatMessage {
    pub(crate) role: Role,
    pub(crate) text: String,
}

/// Append-only transcript, one message per line. Every I/O failure is
/// logged and swallowed.
#[derive(Debug, Clone)]
pub(crate) struct ChatHistory {
    path: PathBuf,
}

impl ChatHistory {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn append(&self, role: Role, text: &str) {
        let line = format!("{}{}\n", role.prefix(), single_line(text));
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to append chat history");
        }
    }

    /// Malformed lines are skipped; a missing file is an empty history.
    pub(crate) fn load(&self) -> Vec<ChatMessage> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read chat history");
                return Vec::new();
            }
        };

        text.lines().filter_map(parse_line).collect()
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_line(line: &str) -> Option<ChatMessage> {
    if let Some(text) = line.strip_prefix(USER_PREFIX) {
        Some(ChatMessage {
            role: Role::User,
            text: text.to_string(),
        })
    } else {
        line.strip_prefix(AI_PREFIX).map(|text| ChatMessage {
            role: Role::Ai,
            text: text.to_string(),
        })
    }
}

//! Chat log for player messages and local announcements.
//!
//! The dispatcher appends through the [`ChatSink`] trait so the UI can own
//! the real log. [`ChatLog`] is the in-memory implementation used by the
//! console client and by tests.

use parking_lot::Mutex;

/// Sink for chat lines produced while the session runs.
///
/// Takes owned Strings for mockall compatibility.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ChatSink: Send + Sync {
    /// Append a locally generated announcement (not attributed to a player).
    fn add_system_line(&self, text: String);

    /// Append a line attributed to a player.
    fn add_chat_line(&self, sender: String, text: String);
}

/// One entry in the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatLine {
    /// Announcement produced by the client itself
    System { text: String },
    /// Message relayed from a player
    Player { sender: String, text: String },
}

/// Append-only in-memory chat log.
#[derive(Debug, Default)]
pub struct ChatLog {
    lines: Mutex<Vec<ChatLine>>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines in append order.
    pub fn lines(&self) -> Vec<ChatLine> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl ChatSink for ChatLog {
    fn add_system_line(&self, text: String) {
        self.lines.lock().push(ChatLine::System { text });
    }

    fn add_chat_line(&self, sender: String, text: String) {
        self.lines.lock().push(ChatLine::Player { sender, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_lines_in_append_order() {
        let log = ChatLog::new();
        assert!(log.is_empty());

        log.add_system_line("Player Zoe connected!".to_string());
        log.add_chat_line("Zoe".to_string(), "hi all".to_string());

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.lines(),
            vec![
                ChatLine::System {
                    text: "Player Zoe connected!".to_string()
                },
                ChatLine::Player {
                    sender: "Zoe".to_string(),
                    text: "hi all".to_string()
                },
            ]
        );
    }
}

//! Transient notices for validation failures and submission results.

use serde::{Deserialize, Serialize};

/// How long a notice stays up before it clears itself
pub const NOTICE_DURATION_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeKind::Info => "form-message info",
            NoticeKind::Success => "form-message success",
            NoticeKind::Warning => "form-message warning",
            NoticeKind::Error => "form-message error",
        }
    }
}

/// A message with an id. Ids only ever grow, so a dismiss timer started for
/// one notice cannot clear a newer one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Issues notices and tracks the one currently shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeBoard {
    last_id: u64,
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn raise(&mut self, kind: NoticeKind, message: impl Into<String>) -> &Notice {
        self.last_id += 1;
        self.current.insert(Notice {
            id: self.last_id,
            kind,
            message: message.into(),
        })
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Number of notices raised so far
    pub fn raised(&self) -> u64 {
        self.last_id
    }

    /// Clear the notice only if it is still the one with `id`
    pub fn dismiss(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|notice| notice.id == id) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_increments_ids() {
        let mut board = NoticeBoard::default();
        let first = board.raise(NoticeKind::Warning, "one").id;
        let second = board.raise(NoticeKind::Error, "two").id;
        assert!(second > first);
        assert_eq!(board.raised(), 2);
        assert_eq!(board.current().unwrap().message, "two");
    }

    #[test]
    fn test_stale_dismiss_keeps_newer_notice() {
        let mut board = NoticeBoard::default();
        let old = board.raise(NoticeKind::Warning, "old").id;
        let new = board.raise(NoticeKind::Warning, "new").id;

        assert!(!board.dismiss(old));
        assert_eq!(board.current().unwrap().id, new);

        assert!(board.dismiss(new));
        assert!(board.current().is_none());
    }
}

//! Non-blocking notifications raised during a session.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MAX_NOTICES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn label(self) -> &'static str {
        match self {
            NoticeLevel::Info => "INFO",
            NoticeLevel::Warning => "WARN",
            NoticeLevel::Error => "ERR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub context: String,
    pub at: DateTime<Utc>,
}

/// Newest first, capped at [`MAX_NOTICES`].
#[derive(Debug, Clone, Default)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>, context: impl Into<String>) {
        self.items.push_front(Notice {
            level,
            message: message.into(),
            context: context.into(),
            at: Utc::now(),
        });
        self.items.truncate(MAX_NOTICES);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_capped_newest_first() {
        let mut notices = Notices::default();
        for i in 0..60 {
            notices.push(NoticeLevel::Warning, format!("notice {i}"), "");
        }
        assert_eq!(notices.len(), MAX_NOTICES);
        assert_eq!(notices.latest().unwrap().message, "notice 59");
        assert_eq!(notices.iter().last().unwrap().message, "notice 10");
    }
}

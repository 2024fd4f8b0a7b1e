//! Reserved word classification.
//!
//! The [`KeywordTable`] is a self-organizing list: every successful lookup
//! moves the matching entry to the front, so the tag names that dominate a
//! document (`task`, `starter`, ...) are found after one or two comparisons.
//! Classification never depends on the current order of the list.

use log::trace;

use crate::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Keyword {
    word: &'static str,
    kind: TokenKind,
}

const KEYWORDS: [Keyword; 10] = [
    Keyword {
        word: "process",
        kind: TokenKind::Process,
    },
    Keyword {
        word: "events",
        kind: TokenKind::Events,
    },
    Keyword {
        word: "col",
        kind: TokenKind::Col,
    },
    Keyword {
        word: "subprocess",
        kind: TokenKind::Subprocess,
    },
    Keyword {
        word: "task",
        kind: TokenKind::EventType,
    },
    Keyword {
        word: "starter",
        kind: TokenKind::EventType,
    },
    Keyword {
        word: "gateway",
        kind: TokenKind::EventType,
    },
    Keyword {
        word: "wait",
        kind: TokenKind::EventType,
    },
    Keyword {
        word: "mail",
        kind: TokenKind::EventType,
    },
    Keyword {
        word: "end",
        kind: TokenKind::EventType,
    },
];

/// Move-to-front keyword list owned by a scanner.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: Vec<Keyword>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordTable {
    pub fn new() -> Self {
        Self {
            entries: KEYWORDS.to_vec(),
        }
    }

    /// Classifies identifier text as a keyword kind or [`TokenKind::Identifier`].
    ///
    /// A hit is moved to the head of the list.
    pub fn classify(&mut self, text: &str) -> TokenKind {
        let Some(position) = self.entries.iter().position(|entry| entry.word == text) else {
            return TokenKind::Identifier;
        };

        if position > 0 {
            self.entries[..=position].rotate_right(1);
            trace!(keyword = text, from = position; "Moved keyword to front");
        }

        self.entries[0].kind
    }

    /// Current order of the list, head first.
    pub fn order(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.word)
    }
}

// src/extract/validate.rs
// =============================================================================
// Decides whether an extracted page has enough text to keep.
//
// A page is accepted when its content is non-empty AND longer than
// min_chars characters AND has more than min_words words (100 and 20 by
// default). Rejection is a normal outcome, not an error.
// =============================================================================

use crate::config::ContentThresholds;
use crate::page::ExtractedPage;
use std::fmt;

// Why a page was filtered out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyContent,
    TooShort { chars: usize, min_chars: usize },
    TooFewWords { words: usize, min_words: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyContent => write!(f, "no content"),
            Rejection::TooShort { chars, min_chars } => {
                write!(f, "{} characters (needs more than {})", chars, min_chars)
            }
            Rejection::TooFewWords { words, min_words } => {
                write!(f, "{} words (needs more than {})", words, min_words)
            }
        }
    }
}

// Checks a page against the default thresholds
pub fn is_acceptable(page: &ExtractedPage) -> bool {
    rejection_reason(page, ContentThresholds::default()).is_none()
}

// Returns why `page` fails `thresholds`, or None if it passes
pub fn rejection_reason(page: &ExtractedPage, thresholds: ContentThresholds) -> Option<Rejection> {
    if page.content().is_empty() {
        return Some(Rejection::EmptyContent);
    }

    if page.content_length() <= thresholds.min_chars {
        return Some(Rejection::TooShort {
            chars: page.content_length(),
            min_chars: thresholds.min_chars,
        });
    }

    if page.word_count() <= thresholds.min_words {
        return Some(Rejection::TooFewWords {
            words: page.word_count(),
            min_words: thresholds.min_words,
        });
    }

    None
}

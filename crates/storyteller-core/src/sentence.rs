use regex::Regex;

use crate::error::{Result, StoryTellerError};

/// Rule-based sentence boundary splitter.
///
/// A sentence ends at a run of `.`, `!` or `?` followed by whitespace or end
/// of input. The terminator stays attached to its sentence. Trailing text
/// without a terminator still counts as a sentence, matching how a truncated
/// model completion should be treated.
pub struct SentenceSplitter {
    boundary: Regex,
}

impl SentenceSplitter {
    /// Compile the boundary rules. This is the startup check for the
    /// tokenization resource; a compile failure is a hard error before any
    /// generation work begins.
    pub fn new() -> Result<Self> {
        let boundary = Regex::new(r"[^.!?]*[.!?]+(?:\s+|$)|[^.!?]+$").map_err(|e| {
            StoryTellerError::SentenceRulesUnavailable {
                reason: e.to_string(),
            }
        })?;
        Ok(Self { boundary })
    }

    /// Split `text` into trimmed sentence strings, in order, no empties.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.boundary
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

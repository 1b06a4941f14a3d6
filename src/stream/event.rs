// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keep-alive lines carry no payload, only whitespace.
pub fn is_keep_alive(line: &str) -> bool {
    line.trim().is_empty()
}

/// A rule that matched a streamed event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// Expansion fields requested by the caller (author_id, created_at, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One event from the filtered stream.
///
/// Legacy stream payloads and in-band error objects have no `data`; their
/// fields land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredEvent {
    #[serde(default)]
    pub data: Option<Tweet>,
    #[serde(default)]
    pub matching_rules: Vec<MatchingRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FilteredEvent {
    /// Decode a raw stream line. Keep-alives decode to `None`.
    pub fn from_line(line: &str) -> Result<Option<Self>, serde_json::Error> {
        if is_keep_alive(line) {
            return Ok(None);
        }
        serde_json::from_str(line).map(Some)
    }

    /// Tags of the rules that matched, in server order. Empty tags skipped.
    pub fn matched_tags(&self) -> impl Iterator<Item = &str> {
        self.matching_rules
            .iter()
            .map(|r| r.tag.as_str())
            .filter(|t| !t.is_empty())
    }
}

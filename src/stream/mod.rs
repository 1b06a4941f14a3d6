// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// Filtered-stream framing.
//
// Responsibilities:
// - Split the open response body into lines, in transmission order
// - Strip `\n` / `\r\n` terminators, keep empty keep-alive lines
// - Hand raw lines to the caller; decoding is opt-in via `FilteredEvent`

mod event;
mod reader;

pub use event::{is_keep_alive, FilteredEvent, MatchingRule, Tweet};
pub use reader::LineReader;

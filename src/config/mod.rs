// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

// Client config loader
//
// Loads filterstream.yaml, checks the format version, resolves `${VAR}`
// references from the environment and builds endpoints + credentials.

mod error;
mod interpolation;
mod loader;
mod raw;
mod source;
mod types;

pub use error::ConfigError;
pub use interpolation::resolve_variables;
pub use loader::load_config;
pub use source::{ConfigSource, FileSource, StringSource};
pub use types::Config;

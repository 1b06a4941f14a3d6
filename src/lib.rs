// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod rules;
pub mod session;
pub mod stream;
pub mod transport;

pub use auth::{Credentials, OAuth1Keys};
pub use error::ClientError;
pub use rules::Rule;
pub use session::Session;
pub use stream::{FilteredEvent, LineReader};

// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

use bytes::BytesMut;
use futures_util::stream::{Stream, StreamExt};

use crate::error::ClientError;
use crate::transport::{ByteStream, HttpBody};

/// Line reader over an open stream response.
///
/// Owning a `LineReader` means owning the connection: dropping it closes the
/// body. Reads take `&mut self`, so there is exactly one consumer.
pub struct LineReader {
    body: ByteStream,
    /// Bytes received but not yet returned as a line.
    buffer: BytesMut,
    /// Prefix of `buffer` already searched for a newline.
    scanned: usize,
    finished: bool,
    lines_read: u64,
}

impl LineReader {
    pub fn new(body: ByteStream) -> Self {
        Self {
            body,
            buffer: BytesMut::new(),
            scanned: 0,
            finished: false,
            lines_read: 0,
        }
    }

    pub fn from_body(body: HttpBody) -> Self {
        Self::new(body.into_stream())
    }

    /// Number of lines returned so far, keep-alives included.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Next line without its terminator.
    ///
    /// Returns `Ok(None)` once the body has ended and every buffered byte has
    /// been returned. A trailing line with no terminator is still returned.
    /// After a read error the reader is finished and buffered bytes are dropped.
    pub async fn next_line(&mut self) -> Result<Option<String>, ClientError> {
        loop {
            let newline = self.buffer[self.scanned..].iter().position(|b| *b == b'\n');
            if let Some(offset) = newline {
                let end = self.scanned + offset;
                let mut line = self.buffer.split_to(end + 1);
                self.scanned = 0;
                line.truncate(end);
                if line.last() == Some(&b'\r') {
                    line.truncate(end - 1);
                }
                return self.emit(line).map(Some);
            }
            self.scanned = self.buffer.len();

            if self.finished {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let rest = self.buffer.split();
                self.scanned = 0;
                return self.emit(rest).map(Some);
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    self.finished = true;
                    self.buffer.clear();
                    self.scanned = 0;
                    tracing::debug!(lines_read = self.lines_read, error = %e, "stream read failed");
                    return Err(ClientError::Transport(e));
                }
                None => {
                    self.finished = true;
                    tracing::debug!(lines_read = self.lines_read, "stream ended");
                }
            }
        }
    }

    fn emit(&mut self, line: BytesMut) -> Result<String, ClientError> {
        self.lines_read += 1;
        Ok(String::from_utf8(line.to_vec())?)
    }

    /// Adapt the reader into a stream of lines. The stream ends after the
    /// body ends or after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<String, ClientError>> + Send {
        futures_util::stream::unfold(self, |mut reader| async move {
            match reader.next_line().await {
                Ok(Some(line)) => Some((Ok(line), reader)),
                Ok(None) => None,
                Err(e) => Some((Err(e), reader)),
            }
        })
    }
}

impl std::fmt::Debug for LineReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("buffered", &self.buffer.len())
            .field("finished", &self.finished)
            .field("lines_read", &self.lines_read)
            .finish()
    }
}

//! Token-oriented console I/O
//!
//! Reads whitespace-separated tokens from any `BufRead`, carrying leftover
//! tokens of a line over to the next request, and writes prompts and report
//! text to any `Write`. The interactive session runs on stdin/stdout; tests
//! run it on in-memory buffers.

use std::collections::VecDeque;
use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::infrastructure::{InfraError, InfraResult};

pub struct Console<R, W> {
    reader: R,
    writer: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            pending: VecDeque::new(),
        }
    }

    /// Next whitespace-separated token, or `None` at end of input.
    ///
    /// Input that is not valid UTF-8 is decoded lossily rather than failing.
    pub fn next_token(&mut self) -> InfraResult<Option<String>> {
        while self.pending.is_empty() {
            let mut line = Vec::new();
            let read = self
                .reader
                .read_until(b'\n', &mut line)
                .map_err(|e| InfraError::console("read", e))?;
            if read == 0 {
                return Ok(None);
            }
            // invalid UTF-8 becomes U+FFFD and is rejected like any bad token
            self.pending.extend(
                String::from_utf8_lossy(&line)
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
        Ok(self.pending.pop_front())
    }

    /// Write `msg` without a newline and flush so it shows before input.
    pub fn prompt(&mut self, msg: &str) -> InfraResult<()> {
        write!(self.writer, "{}", msg).map_err(|e| InfraError::console("write", e))?;
        self.writer
            .flush()
            .map_err(|e| InfraError::console("flush", e))
    }

    /// Write `msg` followed by a newline.
    pub fn say(&mut self, msg: impl Display) -> InfraResult<()> {
        writeln!(self.writer, "{}", msg).map_err(|e| InfraError::console("write", e))
    }

    /// Write `msg` as is (report text carries its own line breaks).
    pub fn write(&mut self, msg: impl Display) -> InfraResult<()> {
        write!(self.writer, "{}", msg).map_err(|e| InfraError::console("write", e))
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

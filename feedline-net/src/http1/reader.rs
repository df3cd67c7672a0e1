use std::io::{self, Read};

use super::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Bytes appended to the window. Zero means the read was interrupted and may be retried.
    Read(usize),
    /// The source reported end of stream.
    Exhausted,
}

/// Growable byte buffer fed from a byte source.
///
/// `buffer[..len]` is the unconsumed window; everything past `len` is scratch space for the
/// next read. Capacity doubles when a fill finds no free space and never shrinks.
#[derive(Debug)]
pub struct BufferedReader<R> {
    source: R,
    buffer: Vec<u8>,
    len: usize,
}

impl<R> BufferedReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, 1024)
    }

    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            source,
            buffer: vec![0; capacity.max(1)],
            len: 0,
        }
    }

    pub fn window(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Drops the first `n` bytes of the window, shifting the rest to the front.
    pub fn consume(&mut self, n: usize) {
        assert!(
            n <= self.len,
            "consume({n}) past window of {} bytes",
            self.len
        );
        self.buffer.copy_within(n..self.len, 0);
        self.len -= n;
    }

    /// Surrenders the unconsumed window.
    pub fn into_window(mut self) -> Vec<u8> {
        self.buffer.truncate(self.len);
        self.buffer
    }

    fn grow_if_full(&mut self) {
        if self.len == self.buffer.len() {
            let doubled = self.buffer.len() * 2;
            self.buffer.resize(doubled, 0);
        }
    }

    fn record_read(&mut self, read: usize) -> Fill {
        if read == 0 {
            return Fill::Exhausted;
        }
        self.len += read;
        Fill::Read(read)
    }
}

impl<R: Read> BufferedReader<R> {
    /// Performs exactly one read from the source into the tail of the buffer.
    pub fn fill(&mut self) -> Result<Fill, ParseError> {
        self.grow_if_full();
        match self.source.read(&mut self.buffer[self.len..]) {
            Ok(read) => Ok(self.record_read(read)),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(Fill::Read(0)),
            Err(err) => Err(ParseError::Io(err)),
        }
    }
}

#[cfg(feature = "tokio")]
impl<R: tokio::io::AsyncRead + Unpin> BufferedReader<R> {
    /// Async counterpart of [`BufferedReader::fill`]. Returns [`ParseError::Cancelled`] if
    /// `cancel` fires before the read completes.
    pub async fn fill_async(
        &mut self,
        cancel: &tokio_util::sync::CancellationToken,
    ) -> Result<Fill, ParseError> {
        use tokio::io::AsyncReadExt;

        self.grow_if_full();
        let len = self.len;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ParseError::Cancelled),
            result = self.source.read(&mut self.buffer[len..]) => result,
        };

        match result {
            Ok(read) => Ok(self.record_read(read)),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(Fill::Read(0)),
            Err(err) => Err(ParseError::Io(err)),
        }
    }
}

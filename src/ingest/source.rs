//! Message Sources
//!
//! Where encoded orders come from. Each source yields raw payloads tagged
//! with a monotonically increasing offset and ends by returning `None`.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::mpsc;
use tracing::error;

/// One encoded record from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub payload: Vec<u8>,
    /// Position in the stream; used for logging only
    pub offset: u64,
}

/// A sequential stream of messages.
#[async_trait]
pub trait MessageSource: Send {
    /// Next message, or `None` once the stream is exhausted.
    async fn next_message(&mut self) -> Option<Message>;
}

// == Channel Source ==
/// Messages pushed through an in-process channel.
///
/// The stream ends when every sender is dropped.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
    offset: u64,
}

impl ChannelSource {
    /// Returns the sending half together with the source.
    pub fn new(buffer: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { rx, offset: 0 })
    }
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn next_message(&mut self) -> Option<Message> {
        let payload = self.rx.recv().await?;
        let offset = self.offset;
        self.offset += 1;
        Some(Message { payload, offset })
    }
}

// == Line Source ==
/// Newline-delimited JSON from any buffered reader. Blank lines are skipped;
/// the offset is the zero-based line number.
///
/// Lines are passed on as raw bytes, so a line that is not valid UTF-8 still
/// becomes a message and fails decoding on its own.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
    line: u64,
}

impl<R> LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
        }
    }
}

impl LineSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl LineSource<BufReader<File>> {
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

#[async_trait]
impl<R> MessageSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Ends at EOF, or on a read error from the underlying reader.
    async fn next_message(&mut self) -> Option<Message> {
        loop {
            let offset = self.line;
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf).await {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    if self.buf.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    let payload = trim_line_end(&self.buf).to_vec();
                    return Some(Message { payload, offset });
                }
                Err(err) => {
                    error!(offset, error = %err, "Error reading message stream");
                    return None;
                }
            }
        }
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

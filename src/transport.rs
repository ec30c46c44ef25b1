//! Transport contract: ordered, reliable delivery of delineated frames.
//!
//! The connection core does not parse wire headers or apply masking; a
//! framing layer below it (not part of this crate) hands over complete
//! frames. These traits capture that contract, and [`pipe`] provides an
//! in-memory duplex implementation for tests and in-process use.

use std::future::Future;

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::protocol::Frame;

/// Read side of a frame-delineated transport.
pub trait FrameRead: Send {
    /// Read the next frame.
    ///
    /// Returns `Ok(None)` on orderly transport EOF (the peer went away
    /// without a close frame) and an error on transport failure.
    fn read_frame(&mut self) -> impl Future<Output = Result<Option<Frame>>> + Send;
}

/// Write side of a frame-delineated transport.
pub trait FrameWrite: Send {
    /// Write one frame, completing once the transport has accepted it.
    fn write_frame(&mut self, frame: Frame) -> impl Future<Output = Result<()>> + Send;
}

/// Read half of an in-memory frame pipe.
#[derive(Debug)]
pub struct PipeReader {
    rx: mpsc::Receiver<Frame>,
}

/// Write half of an in-memory frame pipe.
#[derive(Debug)]
pub struct PipeWriter {
    tx: mpsc::Sender<Frame>,
}

impl FrameRead for PipeReader {
    async fn read_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.rx.recv().await)
    }
}

impl FrameWrite for PipeWriter {
    async fn write_frame(&mut self, frame: Frame) -> Result<()> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| Error::Io("frame pipe closed".into()))
    }
}

/// One end of an in-memory duplex frame transport.
#[derive(Debug)]
pub struct PipeEnd {
    /// Frames arriving from the other end.
    pub reader: PipeReader,
    /// Frames going to the other end.
    pub writer: PipeWriter,
}

/// Create an in-memory duplex frame transport.
///
/// Each direction is a bounded channel of `capacity` frames. Dropping one
/// end's writer surfaces as EOF on the other end's reader.
#[must_use]
pub fn pipe(capacity: usize) -> (PipeEnd, PipeEnd) {
    let (a_tx, b_rx) = mpsc::channel(capacity);
    let (b_tx, a_rx) = mpsc::channel(capacity);
    (
        PipeEnd {
            reader: PipeReader { rx: a_rx },
            writer: PipeWriter { tx: a_tx },
        },
        PipeEnd {
            reader: PipeReader { rx: b_rx },
            writer: PipeWriter { tx: b_tx },
        },
    )
}

//! Destinations for posted records and the pointer-location collaborator.

use super::{wire, EventRecord};
use crate::error::{GestureScrollError, Result};
use crate::vector::Vector;
use bytes::BytesMut;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Receives records in posting order. Records are single-use; the sink owns them.
pub trait EventSink: Send {
    fn post(&mut self, record: EventRecord) -> Result<()>;
}

/// Reports where the pointer is at the moment of a post.
pub trait PointerLocator: Send + Sync {
    fn location(&self) -> Vector;
}

/// A pointer that never moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator(pub Vector);

impl PointerLocator for FixedLocator {
    fn location(&self) -> Vector {
        self.0
    }
}

/// Keeps every record in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<EventRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<EventRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn post(&mut self, record: EventRecord) -> Result<()> {
        self.records.lock().push(record);
        Ok(())
    }
}

/// Writes each record in the binary layout of [`wire`] as soon as it is posted.
pub struct WireSink<W: Write + Send> {
    writer: W,
    buf: BytesMut,
}

impl<W: Write + Send> WireSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: BytesMut::with_capacity(wire::HEADER_LEN + 8 * wire::FIELD_LEN),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> EventSink for WireSink<W> {
    fn post(&mut self, record: EventRecord) -> Result<()> {
        self.buf.clear();
        wire::encode_record(&record, &mut self.buf);
        self.writer
            .write_all(&self.buf)
            .map_err(|err| GestureScrollError::sink("failed to write event record", err))?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{GestureRecord, GesturePhase};
    use std::time::Duration;

    fn gesture(phase: GesturePhase) -> EventRecord {
        EventRecord::Gesture(GestureRecord {
            timestamp: Duration::ZERO,
            location: Vector::ZERO,
            delta: Vector::new(1.0, 2.0),
            phase,
        })
    }

    #[test]
    fn recording_sink_clones_share_the_log() {
        let sink = RecordingSink::new();
        let mut writer = sink.clone();
        writer.post(gesture(GesturePhase::Began)).unwrap();
        writer.post(gesture(GesturePhase::Changed)).unwrap();

        assert_eq!(sink.len(), 2);
        let taken = sink.take();
        assert_eq!(taken[1], gesture(GesturePhase::Changed));
        assert!(sink.is_empty());
    }

    #[test]
    fn wire_sink_writes_encoded_bytes() {
        let mut sink = WireSink::new(Vec::new());
        let record = gesture(GesturePhase::Ended);
        sink.post(record.clone()).unwrap();

        let written = sink.into_inner();
        assert_eq!(&written[..], &wire::encode_records([&record])[..]);
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn wire_sink_reports_write_failures() {
        let mut sink = WireSink::new(BrokenWriter);
        let err = sink.post(gesture(GesturePhase::Began)).unwrap_err();
        assert!(matches!(err, GestureScrollError::SinkError { .. }));
    }
}

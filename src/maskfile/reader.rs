//! Sequential reader of mask files

use super::{EventRecord, Header, NucleusRecord, HEADER_SIZE, RECORD_SIZE};
use crate::error::{MaskError, Result};
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

/// Position of a reader in the mask file reading protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    /// Stream is open, the header has not been read yet
    Opened,

    /// Header was read, no event has been read yet
    HeaderRead,

    /// At least one event was read, more may follow
    Iterating,

    /// The event stream ended cleanly
    Exhausted,

    /// The stream turned out to be corrupted, or could not be read
    Failed,

    /// The stream was released
    Closed,
}

/// Reader of mask files
///
/// Reading follows a strict protocol: first `read_header()`, then
/// `read_data()` until it returns `None`. Any deviation is reported as a
/// `MaskError::State` instead of misinterpreting bytes.
///
/// The underlying stream is released by `close()` or when the reader is
/// dropped, whichever comes first.
///
pub struct MaskFileReader<R = BufReader<File>> {
    /// Byte stream, None once closed
    stream: Option<R>,

    /// Current protocol state
    state: ReaderState,

    /// File header, once read
    header: Option<Header>,

    /// Number of complete events read so far
    events_read: usize,
}
//
impl MaskFileReader<BufReader<File>> {
    /// Open a mask file for reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MaskError::File {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Opened mask file {:?}", path);
        Ok(Self::from_reader(BufReader::new(file)))
    }
}
//
impl<R: Read> MaskFileReader<R> {
    /// Read mask file data from an arbitrary byte stream
    pub fn from_reader(stream: R) -> Self {
        Self {
            stream: Some(stream),
            state: ReaderState::Opened,
            header: None,
            events_read: 0,
        }
    }

    /// Current protocol state
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// File header, if it was read already
    pub fn header(&self) -> Option<Header> {
        self.header
    }

    /// Number of complete events read so far
    pub fn events_read(&self) -> usize {
        self.events_read
    }

    /// Read and decode the file header
    pub fn read_header(&mut self) -> Result<Header> {
        if self.state != ReaderState::Opened {
            return Err(MaskError::State(format!(
                "the header can only be read right after opening, not in state {:?}",
                self.state
            )));
        }

        let mut bytes = [0; HEADER_SIZE];
        let filled = match self.fill(&mut bytes) {
            Ok(filled) => filled,
            Err(e) => return self.fail(e),
        };
        if filled < HEADER_SIZE {
            return self.fail(MaskError::Format(format!(
                "header is truncated ({} of {} bytes)",
                filled, HEADER_SIZE
            )));
        }
        let header = match Header::decode(&bytes) {
            Ok(header) => header,
            Err(e) => return self.fail(e),
        };

        log::debug!(
            "Mask file header: {} samples of {} reactions ({} nuclei per event)",
            header.sample_count,
            header.reaction_type,
            header.nuclei_count()
        );
        self.header = Some(header);
        self.state = ReaderState::HeaderRead;
        Ok(header)
    }

    /// Read the next event, or None if the event stream ended cleanly
    ///
    /// The stream ends cleanly when no byte is left where the next event
    /// should start. Running out of bytes anywhere else means that the file
    /// was truncated, which is reported as a `MaskError::Format`.
    ///
    pub fn read_data(&mut self) -> Result<Option<EventRecord>> {
        let nuclei_count = match (self.state, self.header) {
            (ReaderState::HeaderRead | ReaderState::Iterating, Some(header)) => {
                header.nuclei_count()
            }
            (ReaderState::Exhausted, _) => return Ok(None),
            (ReaderState::Opened, _) => {
                return Err(MaskError::State(
                    "the header must be read before any event".to_owned(),
                ))
            }
            (state, _) => {
                return Err(MaskError::State(format!(
                    "cannot read events in state {:?}",
                    state
                )))
            }
        };

        let mut event = EventRecord::with_capacity(nuclei_count);
        let mut bytes = [0; RECORD_SIZE];
        for nucleus_idx in 0..nuclei_count {
            let filled = match self.fill(&mut bytes) {
                Ok(filled) => filled,
                Err(e) => return self.fail(e),
            };
            match filled {
                0 if nucleus_idx == 0 => {
                    self.end_of_stream();
                    return Ok(None);
                }
                RECORD_SIZE => event.push(NucleusRecord::decode(&bytes)?),
                _ => {
                    return self.fail(MaskError::Format(format!(
                        "event #{} is truncated: nucleus {} of {} has {} of {} bytes",
                        self.events_read, nucleus_idx, nuclei_count, filled, RECORD_SIZE
                    )))
                }
            }
        }

        self.events_read += 1;
        self.state = ReaderState::Iterating;
        log::trace!("Read event #{}", self.events_read);
        Ok(Some(event))
    }

    /// Release the underlying stream
    ///
    /// This can be done in any state, any number of times.
    ///
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("Closed mask file after {} events", self.events_read);
        }
        self.state = ReaderState::Closed;
    }

    /// Read as many bytes as possible into `buf`, stopping early only at the
    /// end of the stream. Returns the number of bytes that were read.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| MaskError::State("the reader is closed".to_owned()))?;
        let mut filled = 0;
        while filled < buf.len() {
            match stream.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Record the clean end of the event stream
    fn end_of_stream(&mut self) {
        self.state = ReaderState::Exhausted;
        log::debug!("End of mask file after {} events", self.events_read);

        // The announced sample count is advisory, the stream content prevails
        if let Some(header) = self.header {
            if usize::try_from(header.sample_count) != Ok(self.events_read) {
                log::warn!(
                    "Mask file header announced {} events, but {} were found",
                    header.sample_count,
                    self.events_read
                );
            }
        }
    }

    /// Record a fatal error, after which no event can be read
    fn fail<T>(&mut self, error: MaskError) -> Result<T> {
        self.state = ReaderState::Failed;
        Err(error)
    }
}

/// Iterating over a reader yields the events that follow the header
///
/// Iteration stops after the end of the event stream, or after reporting the
/// first error. Iterating before the header was read reports a state error
/// and fails the reader.
///
impl<R: Read> Iterator for MaskFileReader<R> {
    type Item = Result<EventRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            ReaderState::HeaderRead | ReaderState::Iterating => self.read_data().transpose(),
            ReaderState::Opened => Some(self.fail(MaskError::State(
                "the header must be read before iterating over events".to_owned(),
            ))),
            ReaderState::Exhausted | ReaderState::Failed | ReaderState::Closed => None,
        }
    }
}

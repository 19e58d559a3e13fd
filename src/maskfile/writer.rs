//! Producer side of the mask file format

use super::{EventRecord, Header};
use crate::error::{MaskError, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Writer of mask files
///
/// The header goes out as soon as the writer is created. Events must then
/// hold exactly as many nuclei as the reaction type requires.
///
pub struct MaskFileWriter<W: Write = BufWriter<File>> {
    /// Byte sink
    sink: W,

    /// Header that was written at the top of the file
    header: Header,

    /// Number of events written so far
    events_written: usize,
}
//
impl MaskFileWriter<BufWriter<File>> {
    /// Create (or truncate) a mask file and write its header
    pub fn create(path: impl AsRef<Path>, header: Header) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| MaskError::File {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Writing {} events to mask file {:?}", header.reaction_type, path);
        Self::from_writer(BufWriter::new(file), header)
    }
}
//
impl<W: Write> MaskFileWriter<W> {
    /// Write mask file data into an arbitrary byte sink
    pub fn from_writer(mut sink: W, header: Header) -> Result<Self> {
        header.encode(&mut sink)?;
        Ok(Self {
            sink,
            header,
            events_written: 0,
        })
    }

    /// Number of events written so far
    pub fn events_written(&self) -> usize {
        self.events_written
    }

    /// Append an event to the file
    pub fn write_event(&mut self, event: &EventRecord) -> Result<()> {
        let nuclei_count = self.header.nuclei_count();
        if event.len() != nuclei_count {
            return Err(MaskError::Format(format!(
                "{} events have {} nuclei, got {}",
                self.header.reaction_type,
                nuclei_count,
                event.len()
            )));
        }
        for record in event {
            record.encode(&mut self.sink)?;
        }
        self.events_written += 1;
        Ok(())
    }

    /// Flush all data and hand back the underlying sink
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush()?;
        if usize::try_from(self.header.sample_count) != Ok(self.events_written) {
            log::warn!(
                "Mask file header announces {} events, but {} were written",
                self.header.sample_count,
                self.events_written
            );
        }
        Ok(self.sink)
    }
}

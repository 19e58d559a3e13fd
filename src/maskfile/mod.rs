//! The mask file format
//!
//! Mask files carry simulated reaction events in a compact binary layout with
//! no embedded schema. An 8-byte header announces the number of samples and
//! the reaction type, and the reaction type alone determines how many nuclei
//! each event holds:
//!
//! ```text
//! Header:     i32 sample_count, i32 reaction_type
//! Per event:  nuclei_count × sub-record
//! Sub-record: i32 Z, i32 A, u8 detected, f64 E, f64 KE, f64 p, f64 theta, f64 phi
//! ```
//!
//! Everything is little-endian and tightly packed, so a sub-record is exactly
//! 49 bytes. There is no per-event length prefix and no trailer: the end of
//! the file is the end of the data.

mod reader;
mod writer;

pub use self::{
    reader::{MaskFileReader, ReaderState},
    writer::MaskFileWriter,
};

use crate::{
    error::{MaskError, Result},
    numeric::Float,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::{
    fmt::{self, Display},
    io::Write,
};

/// Size of the file header in bytes
pub const HEADER_SIZE: usize = 2 * INT_SIZE;

/// Size of a per-nucleus sub-record in bytes
pub const RECORD_SIZE: usize = 2 * INT_SIZE + BOOL_SIZE + 5 * DOUBLE_SIZE;

const INT_SIZE: usize = 4;
const BOOL_SIZE: usize = 1;
const DOUBLE_SIZE: usize = 8;

/// Kind of simulated reaction, which fixes the layout of events
///
/// The set of reaction types is closed: any other code in a file header is a
/// format error.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionType {
    /// Parent -> breakup1 + breakup2
    Decay,

    /// Target(projectile, ejectile)residual
    OneStep,

    /// One-step reaction followed by the breakup of the residual
    TwoStep,

    /// Two-step reaction followed by a second breakup
    ThreeStep,
}
//
impl ReactionType {
    /// Code of this reaction type in mask file headers
    pub fn code(self) -> i32 {
        match self {
            ReactionType::Decay => 0,
            ReactionType::OneStep => 1,
            ReactionType::TwoStep => 2,
            ReactionType::ThreeStep => 3,
        }
    }

    /// Number of nuclei in each event of this reaction type
    pub fn nuclei_count(self) -> usize {
        match self {
            ReactionType::Decay => 3,
            ReactionType::OneStep => 4,
            ReactionType::TwoStep => 6,
            ReactionType::ThreeStep => 8,
        }
    }

    /// Truth that the first step collides a projectile with a target
    ///
    /// Otherwise, the first nucleus decays on its own.
    ///
    pub fn has_projectile(self) -> bool {
        self != ReactionType::Decay
    }
}
//
impl TryFrom<i32> for ReactionType {
    type Error = MaskError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(ReactionType::Decay),
            1 => Ok(ReactionType::OneStep),
            2 => Ok(ReactionType::TwoStep),
            3 => Ok(ReactionType::ThreeStep),
            _ => Err(MaskError::Format(format!(
                "unknown reaction type code {}",
                code
            ))),
        }
    }
}
//
impl Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReactionType::Decay => "Decay",
            ReactionType::OneStep => "OneStep",
            ReactionType::TwoStep => "TwoStep",
            ReactionType::ThreeStep => "ThreeStep",
        };
        write!(f, "{}", name)
    }
}

/// Mask file header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Number of events announced by the producer
    ///
    /// This is informational only: the actual content of the file decides
    /// where the event stream ends.
    ///
    pub sample_count: i32,

    /// Reaction type, fixing the number of nuclei per event
    pub reaction_type: ReactionType,
}
//
impl Header {
    /// Build a header
    pub fn new(sample_count: i32, reaction_type: ReactionType) -> Self {
        Self {
            sample_count,
            reaction_type,
        }
    }

    /// Number of nuclei in each event
    pub fn nuclei_count(&self) -> usize {
        self.reaction_type.nuclei_count()
    }

    /// Decode a header from its on-disk representation
    pub(crate) fn decode(mut bytes: &[u8]) -> Result<Self> {
        let sample_count = bytes.read_i32::<LittleEndian>()?;
        let reaction_type = ReactionType::try_from(bytes.read_i32::<LittleEndian>()?)?;
        Ok(Self::new(sample_count, reaction_type))
    }

    /// Write down the on-disk representation of this header
    pub(crate) fn encode(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_i32::<LittleEndian>(self.sample_count)?;
        writer.write_i32::<LittleEndian>(self.reaction_type.code())?;
        Ok(())
    }
}

/// Per-nucleus data of an event, as stored in mask files
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NucleusRecord {
    /// Number of protons
    pub z: i32,

    /// Number of nucleons
    pub a: i32,

    /// Whether the simulated detector registered this nucleus
    pub detected: bool,

    /// Total energy (MeV)
    pub energy: Float,

    /// Kinetic energy (MeV), as seen by the detector if detected
    pub kinetic_energy: Float,

    /// Norm of the momentum (MeV/c)
    pub momentum: Float,

    /// Polar angle (radians)
    pub theta: Float,

    /// Azimuthal angle (radians)
    pub phi: Float,
}
//
impl NucleusRecord {
    /// Decode a sub-record, which must be exactly RECORD_SIZE bytes long
    pub(crate) fn decode(mut bytes: &[u8]) -> Result<Self> {
        debug_assert_eq!(bytes.len(), RECORD_SIZE);
        Ok(Self {
            z: bytes.read_i32::<LittleEndian>()?,
            a: bytes.read_i32::<LittleEndian>()?,
            detected: bytes.read_u8()? != 0,
            energy: bytes.read_f64::<LittleEndian>()?,
            kinetic_energy: bytes.read_f64::<LittleEndian>()?,
            momentum: bytes.read_f64::<LittleEndian>()?,
            theta: bytes.read_f64::<LittleEndian>()?,
            phi: bytes.read_f64::<LittleEndian>()?,
        })
    }

    /// Write down the on-disk representation of this sub-record
    pub(crate) fn encode(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_i32::<LittleEndian>(self.z)?;
        writer.write_i32::<LittleEndian>(self.a)?;
        writer.write_u8(self.detected as u8)?;
        for value in [
            self.energy,
            self.kinetic_energy,
            self.momentum,
            self.theta,
            self.phi,
        ] {
            writer.write_f64::<LittleEndian>(value)?;
        }
        Ok(())
    }
}

/// One simulated event: the data of every nucleus involved, in the order
/// fixed by the reaction type
pub type EventRecord = Vec<NucleusRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(HEADER_SIZE, 8);
        assert_eq!(RECORD_SIZE, 49);
    }

    #[test]
    fn reaction_type_codes() {
        for (code, nuclei) in [(0, 3), (1, 4), (2, 6), (3, 8)] {
            let rxn = ReactionType::try_from(code).unwrap();
            assert_eq!(rxn.code(), code);
            assert_eq!(rxn.nuclei_count(), nuclei);
        }
        for code in [-1, 4, 5, 42, i32::MAX] {
            assert!(matches!(
                ReactionType::try_from(code),
                Err(MaskError::Format(_))
            ));
        }
    }

    #[test]
    fn sub_record_layout() {
        let record = NucleusRecord {
            z: 2,
            a: 4,
            detected: true,
            energy: 3730.,
            kinetic_energy: 2.5,
            momentum: 136.,
            theta: 0.5,
            phi: 1.5,
        };
        let mut bytes = Vec::new();
        record.encode(&mut bytes).unwrap();
        assert_eq!(bytes.len(), RECORD_SIZE);
        assert_eq!(&bytes[0..4], &2i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &4i32.to_le_bytes());
        assert_eq!(bytes[8], 1);
        assert_eq!(&bytes[9..17], &3730f64.to_le_bytes());
        assert_eq!(&bytes[17..25], &2.5f64.to_le_bytes());
        assert_eq!(&bytes[25..33], &136f64.to_le_bytes());
        assert_eq!(&bytes[33..41], &0.5f64.to_le_bytes());
        assert_eq!(&bytes[41..49], &1.5f64.to_le_bytes());
        assert_eq!(NucleusRecord::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn any_nonzero_byte_means_detected() {
        let mut bytes = Vec::new();
        NucleusRecord::default().encode(&mut bytes).unwrap();
        bytes[8] = 0xff;
        assert!(NucleusRecord::decode(&bytes).unwrap().detected);
    }
}

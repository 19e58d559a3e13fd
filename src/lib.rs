//! mask_kinematics: Reading and reconstructing simulated reaction events
//!
//!
//! # Introduction (for the physicist)
//!
//! Nuclear reaction simulations produce "mask files", in which every event
//! records the identity, the energy and the direction of every nucleus
//! involved in the reaction (target, projectile, ejectile, residual, and the
//! breakup products of the later reaction steps), along with whether a
//! simulated detector registered it.
//!
//! This crate reads these events back and reconstructs the relativistic
//! kinematics of each nucleus: invariant mass, kinetic and excitation energy,
//! lab and center-of-mass angles.
//!
//!
//! # Introduction (for the computer guy)
//!
//! The processing chain is purely sequential:
//!
//! * open a mask file and read its header, which fixes the event layout
//! * read one event at a time, until the byte stream cleanly runs out
//! * turn each nucleus of the event into a 4-momentum, resolving its
//!   ground-state mass through a mass table that is injected by the caller
//! * boost to the center-of-mass frame and derive the observables
//! * hand the observables over to whatever analysis comes next.
//!
//! Physically inconsistent synthetic data is not an error: it surfaces as NaN
//! observables. Only malformed files, protocol misuse and superluminal boosts
//! are reported as errors.

#![warn(missing_docs)]

pub mod analysis;
pub mod error;
pub mod mass;
pub mod maskfile;
pub mod momentum;
pub mod nucleus;
pub mod numeric;

pub use crate::{
    analysis::{reconstruct_event, KinematicsSummary, ParticleKinematics},
    error::{MaskError, Result},
    mass::{Isotope, MassLookup, MassTable},
    maskfile::{EventRecord, Header, MaskFileReader, MaskFileWriter, NucleusRecord, ReactionType},
    nucleus::{KinematicsEngine, Nucleus},
};

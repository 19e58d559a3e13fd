//! This module turns raw mask file events into the per-particle kinematic
//! observables that analysis code consumes, and keeps running summaries of
//! them across events

use crate::{
    error::{MaskError, Result},
    mass::{Isotope, MassTable},
    maskfile::{EventRecord, ReactionType},
    nucleus::KinematicsEngine,
    numeric::{functions::to_degrees, Float},
};
use std::fmt::{self, Display};

/// Kinematics of a nucleus as the simulated detector saw it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedKinematics {
    /// Detected kinetic energy (MeV)
    pub kinetic_energy: Float,

    /// Polar angle (degrees)
    pub theta_deg: Float,

    /// Azimuthal angle (degrees)
    pub phi_deg: Float,
}

/// Kinematic observables of one nucleus of an event
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleKinematics {
    /// Identity of the nucleus
    pub isotope: Isotope,

    /// Isotopic symbol
    pub symbol: String,

    /// Whether the simulated detector registered this nucleus
    pub detected: bool,

    /// Kinetic energy reconstructed from the 4-momentum (MeV)
    pub kinetic_energy: Float,

    /// Polar angle in the lab frame (degrees)
    pub theta_deg: Float,

    /// Azimuthal angle in the lab frame (degrees)
    pub phi_deg: Float,

    /// Polar angle in the center-of-mass frame of the reaction (degrees)
    pub theta_cm_deg: Float,

    /// Excitation energy above the ground state (MeV)
    pub excitation: Float,

    /// What the detector saw, only if the nucleus was detected
    pub detected_values: Option<DetectedKinematics>,
}
//
impl Display for ParticleKinematics {
    /// Dump the observables on a single tab-separated line
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.symbol,
            self.kinetic_energy,
            self.theta_deg,
            self.phi_deg,
            self.theta_cm_deg,
            self.excitation,
            self.detected
        )?;
        if let Some(det) = &self.detected_values {
            write!(
                fmt,
                "\t{}\t{}\t{}",
                det.kinetic_energy, det.theta_deg, det.phi_deg
            )?;
        }
        Ok(())
    }
}

/// Reconstruct the kinematics of every nucleus of an event
///
/// Nuclei come out in file order. Center-of-mass angles are measured in the
/// rest frame of the first reaction step: the decaying parent for decays, the
/// target + projectile system for reactions.
///
pub fn reconstruct_event<M: MassTable>(
    engine: &KinematicsEngine<M>,
    reaction_type: ReactionType,
    event: &EventRecord,
) -> Result<Vec<ParticleKinematics>> {
    if event.len() != reaction_type.nuclei_count() {
        return Err(MaskError::Format(format!(
            "{} events have {} nuclei, got {}",
            reaction_type,
            reaction_type.nuclei_count(),
            event.len()
        )));
    }

    // Build the lab frame 4-momenta
    let nuclei = event
        .iter()
        .map(|record| engine.from_record(record))
        .collect::<Result<Vec<_>>>()?;

    // Find how to go to the center-of-mass frame
    let system = if reaction_type.has_projectile() {
        engine.combine(&nuclei[0], &nuclei[1])?
    } else {
        nuclei[0].clone()
    };
    let boost_to_cm = system.boost_to_cm();

    nuclei
        .into_iter()
        .zip(event.iter())
        .map(|(mut nucleus, record)| {
            let kinetic_energy = nucleus.kinetic_energy();
            let excitation = nucleus.excitation();
            nucleus.apply_boost(&boost_to_cm)?;
            Ok(ParticleKinematics {
                isotope: nucleus.isotope(),
                symbol: nucleus.symbol().to_owned(),
                detected: record.detected,
                kinetic_energy,
                theta_deg: to_degrees(record.theta),
                phi_deg: to_degrees(record.phi),
                theta_cm_deg: to_degrees(nucleus.theta()),
                excitation,
                detected_values: record.detected.then(|| DetectedKinematics {
                    kinetic_energy: record.kinetic_energy,
                    theta_deg: to_degrees(record.theta),
                    phi_deg: to_degrees(record.phi),
                }),
            })
        })
        .collect()
}

/// Running summary of the observables of one nucleus across events
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSummary {
    /// Isotopic symbol, as seen in the first event
    symbol: String,

    /// Number of integrated events
    entries: usize,

    /// Number of events where the nucleus was detected
    detected: usize,

    // Accumulated observables
    sum_kinetic_energy: Float,
    sum_theta_deg: Float,
    sum_phi_deg: Float,
    sum_theta_cm_deg: Float,
    sum_excitation: Float,
    sum_detected_kinetic_energy: Float,
}
//
impl ParticleSummary {
    /// Integrate the observables of one event
    fn integrate(&mut self, particle: &ParticleKinematics) {
        if self.entries == 0 {
            self.symbol = particle.symbol.clone();
        }
        self.entries += 1;
        self.sum_kinetic_energy += particle.kinetic_energy;
        self.sum_theta_deg += particle.theta_deg;
        self.sum_phi_deg += particle.phi_deg;
        self.sum_theta_cm_deg += particle.theta_cm_deg;
        self.sum_excitation += particle.excitation;
        if let Some(det) = &particle.detected_values {
            self.detected += 1;
            self.sum_detected_kinetic_energy += det.kinetic_energy;
        }
    }

    /// Isotopic symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of integrated events
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Number of events where the nucleus was detected
    pub fn detected(&self) -> usize {
        self.detected
    }

    /// Fraction of events where the nucleus was detected
    pub fn efficiency(&self) -> Float {
        self.detected as Float / self.entries as Float
    }

    /// Mean reconstructed kinetic energy (MeV)
    pub fn mean_kinetic_energy(&self) -> Float {
        self.sum_kinetic_energy / self.entries as Float
    }

    /// Mean lab polar angle (degrees)
    pub fn mean_theta_deg(&self) -> Float {
        self.sum_theta_deg / self.entries as Float
    }

    /// Mean lab azimuthal angle (degrees)
    pub fn mean_phi_deg(&self) -> Float {
        self.sum_phi_deg / self.entries as Float
    }

    /// Mean center-of-mass polar angle (degrees)
    pub fn mean_theta_cm_deg(&self) -> Float {
        self.sum_theta_cm_deg / self.entries as Float
    }

    /// Mean excitation energy (MeV)
    pub fn mean_excitation(&self) -> Float {
        self.sum_excitation / self.entries as Float
    }

    /// Mean detected kinetic energy, over detected events only (MeV)
    pub fn mean_detected_kinetic_energy(&self) -> Float {
        self.sum_detected_kinetic_energy / self.detected as Float
    }
}

/// Running summary of the observables of every nucleus across events
#[derive(Clone, Debug, PartialEq)]
pub struct KinematicsSummary {
    /// Number of integrated events
    events: usize,

    /// Per-nucleus summaries, in file order
    particles: Vec<ParticleSummary>,
}
//
impl KinematicsSummary {
    /// Prepare to summarize events of `nuclei_count` nuclei
    pub fn new(nuclei_count: usize) -> Self {
        Self {
            events: 0,
            particles: vec![ParticleSummary::default(); nuclei_count],
        }
    }

    /// Integrate the reconstructed kinematics of one event
    ///
    /// Events must hold as many nuclei as the summary was set up for. A
    /// mismatched event is rejected without touching the running sums.
    ///
    pub fn integrate(&mut self, event: &[ParticleKinematics]) -> Result<()> {
        if event.len() != self.particles.len() {
            return Err(MaskError::Format(format!(
                "summarized events have {} nuclei, got {}",
                self.particles.len(),
                event.len()
            )));
        }
        self.events += 1;
        for (summary, particle) in self.particles.iter_mut().zip(event) {
            summary.integrate(particle);
        }
        Ok(())
    }

    /// Number of integrated events
    pub fn events(&self) -> usize {
        self.events
    }

    /// Per-nucleus summaries, in file order
    pub fn particles(&self) -> &[ParticleSummary] {
        &self.particles
    }
}

//! Relativistic kinematics of nuclei
//!
//! A `Nucleus` is a 4-momentum tagged with the identity of the particle that
//! carries it. Nuclei are built by a `KinematicsEngine`, which owns the mass
//! table used to resolve ground-state masses and isotopic symbols.
//!
//! Physically inconsistent 4-momenta (E² < |p|²) are representable: the
//! derived quantities then come out as NaN, which is how synthetic data
//! problems surface in the analysis.

use crate::{
    error::{MaskError, Result},
    mass::{Isotope, MassTable},
    maskfile::NucleusRecord,
    momentum::{xyz, BoostVector, Momentum, E, X, Y, Z},
    numeric::{reals::consts::PI, Float},
};
use prefix_num_ops::real::*;

/// A nucleus and its 4-momentum in some reference frame
#[derive(Clone, Debug, PartialEq)]
pub struct Nucleus {
    /// Number of protons and nucleons
    isotope: Isotope,

    /// Isotopic symbol (empty for the vacuum)
    symbol: String,

    /// Ground-state nuclear mass (MeV)
    ground_state_mass: Float,

    /// 4-momentum (Px, Py, Pz, E)
    p4: Momentum,
}
//
impl Nucleus {
    // ### IDENTITY ###

    /// Number of protons and nucleons
    pub fn isotope(&self) -> Isotope {
        self.isotope
    }

    /// Isotopic symbol, e.g. "7Be"
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Ground-state mass, as given by the mass table
    pub fn ground_state_mass(&self) -> Float {
        self.ground_state_mass
    }

    // ### KINEMATICS ###

    /// Access the 4-momentum
    pub fn four_momentum(&self) -> &Momentum {
        &self.p4
    }

    /// Total energy
    pub fn energy(&self) -> Float {
        self.p4[E]
    }

    /// Norm of the 3-momentum
    pub fn momentum(&self) -> Float {
        xyz(&self.p4).norm()
    }

    /// Invariant mass, NaN if the 4-momentum is space-like
    pub fn invariant_mass(&self) -> Float {
        let p = self.momentum();
        sqrt(self.p4[E] * self.p4[E] - p * p)
    }

    /// Kinetic energy
    pub fn kinetic_energy(&self) -> Float {
        self.p4[E] - self.invariant_mass()
    }

    /// Polar angle of the momentum (radians), NaN for a nucleus at rest
    pub fn theta(&self) -> Float {
        acos(self.p4[Z] / self.momentum())
    }

    /// Azimuthal angle of the momentum (radians), within [0, 2π)
    pub fn phi(&self) -> Float {
        let phi = self.p4[Y].atan2(self.p4[X]);
        if phi < 0. {
            phi + 2. * PI
        } else {
            phi
        }
    }

    /// Excitation energy above the ground state
    pub fn excitation(&self) -> Float {
        self.invariant_mass() - self.ground_state_mass
    }

    // ### FRAME TRANSFORMS ###

    /// Velocity of this nucleus (in units of c) in the current frame
    ///
    /// Boosting a system at rest by this velocity gives it the kinematics that
    /// this nucleus has in the current frame.
    ///
    pub fn velocity(&self) -> BoostVector {
        xyz(&self.p4) / self.p4[E]
    }

    /// Boost velocity which brings this nucleus to rest
    ///
    /// When this nucleus is a composite system, this is the boost from the
    /// current frame to its center-of-mass frame.
    ///
    pub fn boost_to_cm(&self) -> BoostVector {
        -self.velocity()
    }

    /// Apply a Lorentz boost of velocity `boost` (in units of c) to this
    /// nucleus, returning the transformed 4-momentum
    ///
    /// Boosts at or above the speed of light are rejected, and leave the
    /// nucleus untouched.
    ///
    pub fn apply_boost(&mut self, boost: &BoostVector) -> Result<Momentum> {
        let beta2 = boost.norm_squared();
        if !(beta2 < 1.) {
            return Err(MaskError::InvalidBoost { beta2 });
        }
        let gamma = 1. / sqrt(1. - beta2);

        // The (γ-1)/β² factor has a removable singularity at rest
        let g_factor = if beta2 > 0. {
            (gamma - 1.) / beta2
        } else {
            0.
        };

        let p = xyz(&self.p4);
        let energy = self.p4[E];
        let bdotp = boost.dot(&p);
        let new_p = p + boost * (g_factor * bdotp + gamma * energy);
        let new_energy = gamma * (energy + bdotp);

        self.p4 = Momentum::new(new_p.x, new_p.y, new_p.z, new_energy);
        Ok(self.p4)
    }
}

/// Builder and combiner of nuclei, backed by a mass table
pub struct KinematicsEngine<M> {
    masses: M,
}
//
impl<M: MassTable> KinematicsEngine<M> {
    /// Set up an engine that resolves identities using this mass table
    pub fn new(masses: M) -> Self {
        Self { masses }
    }

    /// Access the mass table
    pub fn masses(&self) -> &M {
        &self.masses
    }

    // ### CONSTRUCTION ###

    /// Nucleus at rest in its ground state
    pub fn nucleus(&self, isotope: Isotope) -> Result<Nucleus> {
        let mut nucleus = self.with_momentum(isotope, Momentum::zeros())?;
        nucleus.p4[E] = nucleus.ground_state_mass;
        Ok(nucleus)
    }

    /// Nucleus with cartesian momentum components
    pub fn from_cartesian(
        &self,
        isotope: Isotope,
        px: Float,
        py: Float,
        pz: Float,
        energy: Float,
    ) -> Result<Nucleus> {
        self.with_momentum(isotope, Momentum::new(px, py, pz, energy))
    }

    /// Nucleus with a momentum of norm `p` along the (theta, phi) direction
    pub fn from_spherical(
        &self,
        isotope: Isotope,
        theta: Float,
        phi: Float,
        p: Float,
        energy: Float,
    ) -> Result<Nucleus> {
        let (sin_theta, cos_theta) = (sin(theta), cos(theta));
        self.from_cartesian(
            isotope,
            p * sin_theta * cos(phi),
            p * sin_theta * sin(phi),
            p * cos_theta,
            energy,
        )
    }

    /// Nucleus described by a mask file sub-record
    pub fn from_record(&self, record: &NucleusRecord) -> Result<Nucleus> {
        self.from_spherical(
            Isotope::new(record.z, record.a),
            record.theta,
            record.phi,
            record.momentum,
            record.energy,
        )
    }

    // ### COMBINATION ###

    /// Composite system made of both nuclei (e.g. a compound nucleus)
    pub fn combine(&self, first: &Nucleus, second: &Nucleus) -> Result<Nucleus> {
        self.with_momentum(first.isotope.combine(second.isotope), first.p4 + second.p4)
    }

    /// What remains of the `system` once `part` has been removed from it
    pub fn difference(&self, system: &Nucleus, part: &Nucleus) -> Result<Nucleus> {
        self.with_momentum(system.isotope.difference(part.isotope), system.p4 - part.p4)
    }

    /// Resolve an identity and attach a 4-momentum to it
    fn with_momentum(&self, isotope: Isotope, p4: Momentum) -> Result<Nucleus> {
        let (symbol, ground_state_mass) = if isotope.is_vacuum() {
            (String::new(), 0.)
        } else {
            (self.masses.symbol(isotope)?, self.masses.mass(isotope)?)
        };
        Ok(Nucleus {
            isotope,
            symbol,
            ground_state_mass,
            p4,
        })
    }
}

//! This module is in charge of outputting the kinematics summary to the
//! standard output and to the report file

use crate::config::Configuration;

use mask_kinematics::{
    analysis::ParticleSummary,
    numeric::{reals, Float},
    Header, KinematicsSummary,
};

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use std::{
    fs::File,
    io::{self, BufWriter, Result, Write},
    time::Duration,
};

// Number of significant digits in file output
//
// One less than the machine precision, so that rounding noise stays out of
// the report.
//
const SIG_DIGITS: usize = (reals::DIGITS - 1) as usize;

/// What happened during a run, besides the summarized kinematics
pub struct RunStats<'a> {
    /// Header of the processed mask file
    pub header: &'a Header,

    /// Number of events that were read from the mask file
    pub events_read: usize,

    /// Number of events dropped because their kinematics could not be boosted
    pub skipped_events: usize,

    /// Wall-clock duration of the event loop
    pub elapsed_time: Duration,
}

/// Output the run summary to the console and to the report file
pub fn dump_summary(
    cfg: &Configuration,
    stats: &RunStats,
    summary: &KinematicsSummary,
) -> Result<()> {
    // Print out the headline figures on stdout
    println!(
        "Processed {} {} events ({} skipped) in {:?}",
        stats.events_read, stats.header.reaction_type, stats.skipped_events, stats.elapsed_time
    );

    // Compute a timestamp of when the run ended
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    // Write the full report to disk
    let mut report = BufWriter::new(File::create(&cfg.output_file)?);
    write_report(&mut report, &timestamp, stats, summary)?;
    report.flush()
}

/// Write the run report to an arbitrary sink
fn write_report(
    writer: &mut impl Write,
    timestamp: &str,
    stats: &RunStats,
    summary: &KinematicsSummary,
) -> Result<()> {
    writeln_3p(writer, timestamp)?;
    writeln_3p(writer, "---------------------------------------------")?;
    let reaction_type = stats.header.reaction_type.to_string();
    writeln_3p(writer, ("Reaction type", &reaction_type[..]))?;
    writeln_3p(writer, ("Events announced", stats.header.sample_count))?;
    writeln_3p(writer, ("Events read", stats.events_read))?;
    writeln_3p(writer, ("Events skipped", stats.skipped_events))?;
    writeln_3p(writer, ("Events summarized", summary.events()))?;
    let elapsed_secs = stats.elapsed_time.as_secs_f64();
    writeln_3p(writer, ("Elapsed time (s)", elapsed_secs))?;
    if summary.events() > 0 {
        let secs_per_ev = elapsed_secs / (summary.events() as Float);
        writeln_3p(writer, ("Elapsed time per event (s)", secs_per_ev))?;
    }

    for (index, particle) in summary.particles().iter().enumerate() {
        writeln_3p(writer, "---------------------------------------------")?;
        write_particle(writer, index, particle)?;
    }
    Ok(())
}

/// Write the summary block of one nucleus slot
fn write_particle(writer: &mut impl Write, index: usize, particle: &ParticleSummary) -> Result<()> {
    writeln_3p(writer, ("Nucleus", index))?;
    writeln_3p(writer, ("Symbol", particle.symbol()))?;
    writeln_3p(writer, ("Entries", particle.entries()))?;
    writeln_3p(writer, ("Detected", particle.detected()))?;
    writeln_3p(writer, ("Efficiency", particle.efficiency()))?;
    writeln_3p(writer, ("Mean kinetic energy (MeV)", particle.mean_kinetic_energy()))?;
    writeln_3p(writer, ("Mean theta (deg)", particle.mean_theta_deg()))?;
    writeln_3p(writer, ("Mean phi (deg)", particle.mean_phi_deg()))?;
    writeln_3p(writer, ("Mean CM theta (deg)", particle.mean_theta_cm_deg()))?;
    writeln_3p(writer, ("Mean excitation (MeV)", particle.mean_excitation()))?;
    let detected_ke = particle.mean_detected_kinetic_energy();
    writeln_3p(writer, ("Mean detected energy (MeV)", detected_ke))
}

/// Text output facility that lines up report entries
fn writeln_3p(writer: &mut impl Write, data: impl WriteReport) -> Result<()> {
    write!(writer, " ")?;
    data.write(writer)?;
    writeln!(writer)
}

/// Trait implemented by things which can be printed in the report
trait WriteReport: Sized {
    /// Write down `self` to the report using its column layout
    fn write<W: Write>(self, writer: &mut W) -> Result<()>;
}

impl WriteReport for &str {
    // Strings work in the usual way
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteReport for usize {
    // Integers work in the usual way too
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteReport for i32 {
    // Header counters are signed on disk
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", self)
    }
}

impl WriteReport for Float {
    // Floats are printed in a %g-like way
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write_engineering(writer, self, SIG_DIGITS)
    }
}

impl<T: WriteReport> WriteReport for (&str, T) {
    // Key-value output that uses fixed-size columns for better readability
    fn write<W: Write>(self, writer: &mut W) -> Result<()> {
        write!(writer, "{:<31}: ", self.0)?;
        self.1.write(writer)
    }
}

/// Write a floating-point number using "engineering" notation
///
/// Analogous to the %g format of the C printf function, this method switches
/// between naive and scientific notation for floating-point numbers when the
/// number being printed becomes so small that printing leading zeroes could end
/// up larger than the scientific notation, or so large that we would be forced
/// to print more significant digits than requested.
///
/// NaN and infinities go through the scientific branch, which prints them as
/// Rust usually does.
///
fn write_engineering(writer: &mut impl Write, x: Float, sig_digits: usize) -> Result<()> {
    let mut precision = sig_digits - 1;
    if x == 0. {
        // Zero is special because you can't take its log
        write!(writer, "0")
    } else {
        // Otherwise, use log to evaluate order of magnitude
        let log_x = x.abs().log10();
        if log_x >= -3. && log_x < (sig_digits as Float) {
            // Print using naive notation
            //
            // Since Rust's precision controls number of digits after the
            // decimal point, we must adjust it depending on magnitude in order
            // to operate at a constant number of significant digits.
            precision = (precision as isize - log_x.trunc() as isize).max(0) as usize;

            // Numbers smaller than 1 must get one extra digit since the leading
            // zero does not count as a significant digit.
            if log_x < 0. {
                precision += 1
            }

            // People don't normally expect trailing zeros or decimal point in
            // naive notation, but be careful with integer numbers...
            let str_with_zeros = format!("{:.1$}", x, precision);
            if str_with_zeros.contains('.') {
                write!(
                    writer,
                    "{}",
                    str_with_zeros.trim_end_matches('0').trim_end_matches('.')
                )
            } else {
                write!(writer, "{}", str_with_zeros)
            }
        } else {
            // Print using scientific notation
            write!(writer, "{:.1$e}", x, precision)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_kinematics::ReactionType;

    fn engineering(x: Float, sig_digits: usize) -> String {
        let mut buf = Vec::new();
        write_engineering(&mut buf, x, sig_digits).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn engineering_notation() {
        assert_eq!(engineering(0., 6), "0");
        assert_eq!(engineering(1234.5, 6), "1234.5");
        assert_eq!(engineering(100., 3), "100");
        assert_eq!(engineering(-0.5, 3), "-0.5");
        assert_eq!(engineering(0.001234, 3), "0.00123");
        assert_eq!(engineering(1e-5, 3), "1.00e-5");
        assert_eq!(engineering(123456., 3), "1.23e5");
        assert_eq!(engineering(999., 3), "999");
        assert_eq!(engineering(Float::NAN, 6), "NaN");
    }

    #[test]
    fn report_has_one_block_per_nucleus() {
        let header = Header::new(10, ReactionType::Decay);
        let stats = RunStats {
            header: &header,
            events_read: 0,
            skipped_events: 0,
            elapsed_time: Duration::from_millis(250),
        };
        let summary = KinematicsSummary::new(header.nuclei_count());
        let mut buf = Vec::new();
        write_report(&mut buf, "2024-01-01T00:00:00Z", &stats, &summary).unwrap();
        let report = String::from_utf8(buf).unwrap();

        assert!(report.starts_with(" 2024-01-01T00:00:00Z\n"));
        assert!(report.contains(&format!(" {:<31}: 10\n", "Events announced")));
        assert!(report.contains(&format!(" {:<31}: 0.25\n", "Elapsed time (s)")));
        assert!(!report.contains("per event"));
        assert_eq!(report.matches("Nucleus").count(), 3);
    }
}

//! mask_kinematics: Kinematics report of a simulated reaction
//!
//! This program reads a mask file event by event, reconstructs the kinematics
//! of every nucleus involved in each event, and summarizes them into a report.
//! What to read and where to write is set by the `kinematics.cfg` file in the
//! working directory.

#![warn(missing_docs)]

mod config;
mod output;

use eyre::WrapErr;

use crate::{config::Configuration, output::RunStats};

use mask_kinematics::{
    reconstruct_event, KinematicsEngine, KinematicsSummary, MaskError, MaskFileReader, MassLookup,
};

use std::time::Instant;

/// We'll use eyre's type-erased result type throughout the application
type Result<T> = eyre::Result<T>;

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    // Logging verbosity is controlled through the RUST_LOG environment variable
    env_logger::init();

    // ### CONFIGURATION READOUT ###

    let cfg = Configuration::load("kinematics.cfg").wrap_err("Failed to load the configuration")?;

    // ### ANALYSIS INITIALIZATION ###

    // Resolve nuclear masses through the atomic mass evaluation
    let masses = MassLookup::load(&cfg.mass_file).wrap_err("Failed to load the mass table")?;
    let engine = KinematicsEngine::new(masses);

    // Open the mask file and find out which kind of reaction it holds
    let mut reader = MaskFileReader::open(&cfg.mask_file).wrap_err("Failed to open the mask file")?;
    let header = reader
        .read_header()
        .wrap_err("Failed to read the mask file header")?;
    let mut summary = KinematicsSummary::new(header.nuclei_count());

    // NOTE: The clock starts after the setup I/O, so that only event
    //       processing is timed
    let saved_time = Instant::now();

    // ### EVENT PROCESSING ###

    let max_events = if cfg.max_events == 0 {
        usize::MAX
    } else {
        cfg.max_events
    };
    let mut skipped_events = 0;
    while reader.events_read() < max_events {
        // Fetch the next event, stopping at the end of the file
        let Some(event) = reader
            .read_data()
            .wrap_err_with(|| format!("Failed to read event {}", reader.events_read()))?
        else {
            break;
        };

        // Events whose center-of-mass system cannot be reached are dropped
        let rows = match reconstruct_event(&engine, header.reaction_type, &event) {
            Ok(rows) => rows,
            Err(MaskError::InvalidBoost { beta2 }) => {
                log::warn!(
                    "Skipping event {}: boost with beta^2 = {} is not physical",
                    reader.events_read() - 1,
                    beta2
                );
                skipped_events += 1;
                continue;
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| {
                    format!("Failed to reconstruct event {}", reader.events_read() - 1)
                })
            }
        };

        if cfg.print_events {
            for row in &rows {
                println!("{}", row);
            }
        }
        summary
            .integrate(&rows)
            .wrap_err("Failed to summarize an event")?;
    }
    reader.close();

    // ### RESULTS DISPLAY AND STORAGE ###

    // Measure how much time has elapsed
    let stats = RunStats {
        header: &header,
        events_read: reader.events_read(),
        skipped_events,
        elapsed_time: saved_time.elapsed(),
    };

    // Send the results to the standard output and to disk and we're done
    output::dump_summary(&cfg, &stats, &summary).wrap_err("Failed to output the results")?;

    // ...and we're done
    Ok(())
}

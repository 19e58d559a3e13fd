//! Mechanism for loading the configuration of a kinematics run

use crate::Result;

use eyre::{ensure, eyre, WrapErr};

use std::{fs::File, io::Read, path::PathBuf, str::FromStr};

/// Run configuration
#[derive(Debug)]
pub struct Configuration {
    /// Mask file to be analyzed
    pub mask_file: PathBuf,

    /// Atomic mass evaluation table
    pub mass_file: PathBuf,

    /// Where the kinematics report should be written
    pub output_file: PathBuf,

    /// Maximal number of events to be processed (0 means the whole file)
    pub max_events: usize,

    /// Whether the observables of every event should be printed out
    pub print_events: bool,
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    pub fn load(file_name: &str) -> Result<Self> {
        // Read out the configuration file or die trying.
        let config_str = {
            let mut config_file = File::open(file_name)?;
            let mut buffer = String::new();
            config_file.read_to_string(&mut buffer)?;
            buffer
        };
        let config = Self::parse(&config_str)?;

        // Display it, so that runs can be told apart from their output
        config.print();
        Ok(config)
    }

    /// Decode and check the contents of a configuration file
    pub fn parse(config_str: &str) -> Result<Self> {
        // Configuration items are the first non-whitespace chunk of text on
        // each line, anything after that is a comment. Blank lines are ignored.
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // This closure fetches the next configuration item, tagging it with
        // the name of the configuration field which it is supposed to fill to
        // ease error reporting, and handling unexpected end-of-file too.
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| eyre!("Missing configuration of {}", name))
        };

        // Decode the configuration items into concrete values
        let config = Configuration {
            mask_file: next_item("mask_file")?.parse::<PathBuf>()?,
            mass_file: next_item("mass_file")?.parse::<PathBuf>()?,
            output_file: next_item("output_file")?.parse::<PathBuf>()?,
            max_events: next_item("max_events")?.parse::<usize>()?,
            print_events: next_item("print_events")?.parse_bool()?,
        };

        // The report must not overwrite the data it is computed from
        ensure!(
            config.output_file != config.mask_file && config.output_file != config.mass_file,
            "The output file must differ from the input files"
        );

        Ok(config)
    }

    /// Display the configuration
    pub fn print(&self) {
        println!("MASK FILE      : {}", self.mask_file.display());
        println!("MASS FILE      : {}", self.mass_file.display());
        println!("OUTPUT FILE    : {}", self.output_file.display());
        println!("MAX EVENTS     : {}", self.max_events);
        println!("PRINT EVENTS   : {}", self.print_events);
    }
}

/// A value from the configuration file, tagged with the struct field which it
/// is supposed to map for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a struct field tag and raw iterator data
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: ::std::error::Error + Send + Sync + 'static,
    {
        self.data
            .parse::<T>()
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }

    /// Parse this data using special logic which handles Fortran's bool syntax
    fn parse_bool(self) -> Result<bool> {
        match self.data.to_lowercase().as_str() {
            // Handle FORTRAN booleans as a special case
            ".true." => Ok(true),
            ".false." => Ok(false),
            // Delegate other booleans to the standard Rust parser
            _ => self.parse::<bool>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
data/7Bedp.mask     Mask file
etc/mass.txt        Mass table

kinematics.txt      Report
0                   Max events (0 = all)
.false.             Print events
";

    #[test]
    fn parses_items_in_order() {
        let cfg = Configuration::parse(SAMPLE).unwrap();
        assert_eq!(cfg.mask_file, PathBuf::from("data/7Bedp.mask"));
        assert_eq!(cfg.mass_file, PathBuf::from("etc/mass.txt"));
        assert_eq!(cfg.output_file, PathBuf::from("kinematics.txt"));
        assert_eq!(cfg.max_events, 0);
        assert!(!cfg.print_events);
    }

    #[test]
    fn accepts_both_bool_syntaxes() {
        for (text, expected) in [(".TRUE.", true), ("true", true), ("false", false)] {
            let config_str = SAMPLE.replace(".false.", text);
            assert_eq!(Configuration::parse(&config_str).unwrap().print_events, expected);
        }
    }

    #[test]
    fn reports_missing_items_by_name() {
        // Blank lines do not count as items
        let truncated = SAMPLE.lines().take(3).collect::<Vec<_>>().join("\n");
        let err = Configuration::parse(&truncated).unwrap_err();
        assert!(err.to_string().contains("output_file"));

        let truncated = SAMPLE.lines().take(4).collect::<Vec<_>>().join("\n");
        let err = Configuration::parse(&truncated).unwrap_err();
        assert!(err.to_string().contains("max_events"));
    }

    #[test]
    fn reports_bad_items_by_name() {
        let bad = SAMPLE.replace("0                   Max", "-5                  Max");
        let err = Configuration::parse(&bad).unwrap_err();
        assert!(err.to_string().contains("max_events"));
    }

    #[test]
    fn output_must_not_clobber_inputs() {
        let bad = SAMPLE.replace("kinematics.txt", "etc/mass.txt");
        assert!(Configuration::parse(&bad).is_err());
    }
}

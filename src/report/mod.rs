use std::error::Error;

use colored::*;

use crate::config::Settings;

/// How much the converters print, for success and failure alike.
///
/// The original scripts disagreed on error depth (one printed a full
/// trace, the other a single line); this policy replaces that asymmetry
/// with one configurable knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Success or one-line error only
    Quiet,
    /// Plus the structural summary table
    Summary,
    /// Plus post-conversion details and the error cause chain
    Full,
}

impl Verbosity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" => Some(Verbosity::Quiet),
            "summary" => Some(Verbosity::Summary),
            "full" => Some(Verbosity::Full),
            _ => None,
        }
    }
}

/// Reporting policy for one converter run.
#[derive(Debug, Clone, Copy)]
pub struct ReportPolicy {
    pub verbosity: Verbosity,
    /// When false a caught failure still exits 0, matching the original
    /// scripts; when true it exits 1.
    pub strict_exit: bool,
}

impl ReportPolicy {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            strict_exit: false,
        }
    }

    /// Apply overrides from loaded settings on top of the binary's
    /// built-in default.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(verbosity) = settings.report.verbosity.as_deref().and_then(Verbosity::parse) {
            self.verbosity = verbosity;
        }
        if settings.report.strict_exit {
            self.strict_exit = true;
        }
        self
    }

    /// Apply command line flag overrides; flags win over settings.
    pub fn with_flags(mut self, quiet: bool, verbose: bool, strict: bool) -> Self {
        if quiet {
            self.verbosity = Verbosity::Quiet;
        }
        if verbose {
            self.verbosity = Verbosity::Full;
        }
        if strict {
            self.strict_exit = true;
        }
        self
    }

    /// Print a conversion failure at the configured depth.
    pub fn report_failure(&self, err: &(dyn Error + 'static)) {
        if self.verbosity >= Verbosity::Full {
            println!("{}", format!("Conversion Error: {}", err).red());
            let mut source = err.source();
            while let Some(cause) = source {
                println!("  caused by: {}", cause);
                source = cause.source();
            }
        } else {
            println!("Error converting model: {}", err);
        }
    }

    /// Process exit code for a caught failure.
    pub fn exit_code(&self) -> i32 {
        if self.strict_exit {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, ReportConfig};

    #[test]
    fn test_parse_verbosity() {
        assert_eq!(Verbosity::parse("quiet"), Some(Verbosity::Quiet));
        assert_eq!(Verbosity::parse("Summary"), Some(Verbosity::Summary));
        assert_eq!(Verbosity::parse("FULL"), Some(Verbosity::Full));
        assert_eq!(Verbosity::parse("loud"), None);
    }

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Quiet < Verbosity::Summary);
        assert!(Verbosity::Summary < Verbosity::Full);
    }

    #[test]
    fn test_flags_win_over_settings() {
        let settings = Settings {
            report: ReportConfig {
                verbosity: Some("summary".to_string()),
                strict_exit: false,
            },
            logging: LoggingConfig::default(),
        };
        let policy = ReportPolicy::new(Verbosity::Full)
            .with_settings(&settings)
            .with_flags(true, false, true);
        assert_eq!(policy.verbosity, Verbosity::Quiet);
        assert!(policy.strict_exit);
    }

    #[test]
    fn test_default_exit_code_is_zero() {
        let policy = ReportPolicy::new(Verbosity::Quiet);
        assert_eq!(policy.exit_code(), 0);
        let strict = ReportPolicy::new(Verbosity::Quiet).with_flags(false, false, true);
        assert_eq!(strict.exit_code(), 1);
    }
}

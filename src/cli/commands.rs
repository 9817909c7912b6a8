use clap::Parser;
use std::path::PathBuf;

/// Builds the web front-end if the toolchain is present, otherwise writes a
/// placeholder page, and serves the result with single-page-app routing
#[derive(Parser, Debug)]
#[command(
    name = "janatonese-server",
    version,
    author,
    long_about = "Probes for the front-end build tool, runs the web build when it is \
                  available and falls back to a static placeholder page otherwise. \
                  The HTTP listener starts immediately on $PORT (default 3000) and \
                  serves whatever the output directory holds.\n\n\
                  Most settings come from JANATONESE_* environment variables."
)]
pub struct CliArgs {
    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(
        long,
        value_name = "DIR",
        help = "Front-end project root (overrides JANATONESE_FRONTEND_ROOT)"
    )]
    pub frontend_root: Option<PathBuf>,
}

impl CliArgs {
    /// Flag-derived level, if any flag asks for one.
    pub fn level_override(&self) -> Option<&str> {
        if let Some(level) = &self.log_level {
            Some(level.as_str())
        } else if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_required() {
        let args = CliArgs::try_parse_from(["janatonese-server"]).unwrap();
        assert!(args.frontend_root.is_none());
        assert_eq!(args.level_override(), None);
    }

    #[test]
    fn test_level_override_precedence() {
        let args =
            CliArgs::try_parse_from(["janatonese-server", "--log-level", "trace", "-v"]).unwrap();
        assert_eq!(args.level_override(), Some("trace"));

        let args = CliArgs::try_parse_from(["janatonese-server", "-q"]).unwrap();
        assert_eq!(args.level_override(), Some("error"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["janatonese-server", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_rejects_subcommands() {
        assert!(CliArgs::try_parse_from(["janatonese-server", "detect"]).is_err());
    }

    #[test]
    fn test_frontend_root_flag() {
        let args =
            CliArgs::try_parse_from(["janatonese-server", "--frontend-root", "/srv/app"]).unwrap();
        assert_eq!(args.frontend_root, Some(PathBuf::from("/srv/app")));
    }
}

//! Command-line options shared by the binaries.

use std::path::PathBuf;

use clap::Parser;

/// Ticks the headless runner simulates when `--ticks` is not given (five minutes at 60 Hz).
pub const DEFAULT_SOAK_TICKS: u64 = 18_000;

/// A first-person survival horror raycaster
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct LaunchArgs {
    /// JSON file with tuning overrides
    #[arg(long, value_name = "PATH")]
    pub tuning: Option<PathBuf>,

    /// Seed for the simulation's random source; drawn from the OS when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding `<sprite>.png` art
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Ticks to simulate in a headless run
    #[arg(long, default_value_t = DEFAULT_SOAK_TICKS)]
    pub ticks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        LaunchArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_all_flags() {
        let args = LaunchArgs::try_parse_from([
            "hollow", "--seed", "7", "--ticks", "120", "--assets", "art", "--tuning", "t.json",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.ticks, 120);
        assert_eq!(args.assets, Some(PathBuf::from("art")));
        assert_eq!(args.tuning, Some(PathBuf::from("t.json")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(LaunchArgs::try_parse_from(["hollow", "--seed"]).is_err());
        assert!(LaunchArgs::try_parse_from(["hollow", "--seed", "many"]).is_err());
        assert!(LaunchArgs::try_parse_from(["hollow", "--fullscreen"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let args = LaunchArgs::try_parse_from(["hollow"]).unwrap();
        assert_eq!(args.ticks, DEFAULT_SOAK_TICKS);
        assert_eq!(args.seed, None);
        assert_eq!(args.tuning, None);
        assert_eq!(args.assets, None);
    }
}

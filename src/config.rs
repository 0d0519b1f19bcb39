use std::path::PathBuf;

use clap::Parser;

use crate::data::export::DEFAULT_EXPORT_NAME;

/// Environment variable that overrides the dataset location.
pub const DATASET_ENV: &str = "MARRIAGE_DATASET";

const DEFAULT_DATASET: &str = "data/World Marriage Dataset.csv";

/// Command-line arguments of the dashboard.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Interactive explorer for the World Marriage dataset",
    long_about = None
)]
pub struct Args {
    /// CSV, JSON or Parquet file to load at startup
    ///
    /// Defaults to `data/World Marriage Dataset.csv`.
    #[arg(env = DATASET_ENV)]
    pub dataset: Option<PathBuf>,
}

/// Startup settings. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Dataset loaded at startup.
    pub dataset_path: PathBuf,
    /// File name suggested when exporting the filtered view.
    pub export_name: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            export_name: DEFAULT_EXPORT_NAME.to_string(),
            window_size: [1280.0, 860.0],
            min_window_size: [640.0, 420.0],
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut config = Config::default();
        if let Some(path) = args.dataset {
            config.dataset_path = path;
        }
        config
    }
}

impl Config {
    /// Positional argument wins, then `MARRIAGE_DATASET`, then the default
    /// path. Unknown flags are a usage error.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Args::try_parse_from(args).map(Config::from)
    }

    /// Parse the process arguments; `--help`, `--version` and usage errors
    /// exit the process.
    pub fn from_env() -> Self {
        Config::from(Args::parse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind;

    // Both cases touch the process environment, so they share one test.
    #[test]
    fn argument_then_env_then_default() {
        std::env::set_var(DATASET_ENV, "b.csv");
        let with_arg = Config::from_args(["marriage-explorer", "a.csv"]).unwrap();
        let env_only = Config::from_args(["marriage-explorer"]).unwrap();
        std::env::remove_var(DATASET_ENV);
        let bare = Config::from_args(["marriage-explorer"]).unwrap();

        assert_eq!(with_arg.dataset_path, PathBuf::from("a.csv"));
        assert_eq!(env_only.dataset_path, PathBuf::from("b.csv"));
        assert_eq!(bare, Config::default());
        assert_eq!(bare.export_name, "filtered_data.csv");
    }

    #[test]
    fn help_is_not_a_dataset_path() {
        let err = Config::from_args(["marriage-explorer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let err = Config::from_args(["marriage-explorer", "--verbose"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn args_convert_into_config() {
        let config = Config::from(Args { dataset: Some(PathBuf::from("x.parquet")) });
        assert_eq!(config.dataset_path, PathBuf::from("x.parquet"));
        assert_eq!(config.window_size, Config::default().window_size);
    }
}

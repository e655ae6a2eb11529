//! Command-line arguments.

use clap::{Parser, Subcommand};

/// coursefind - search courses by title, professor or course code
#[derive(Parser, Debug)]
#[command(name = "coursefind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Keep cached results in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for courses
    #[command(alias = "s")]
    Search {
        /// Search mode: title, professor or code
        #[arg(short, long, default_value = "title")]
        mode: String,

        /// When suggestions are offered, search for the Nth one
        #[arg(long)]
        pick: Option<usize>,

        /// Search term
        #[arg(required = true)]
        term: Vec<String>,
    },

    /// Ask the course assistant; reads questions from stdin when none is given
    #[command(alias = "chat")]
    Ask {
        question: Vec<String>,
    },

    /// Report the configured position to the backend
    Locate {
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// Remove expired cached results
    Evict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args() {
        let cli = Cli::try_parse_from(["coursefind", "search", "--mode", "code", "--pick", "2", "101"]).unwrap();
        match cli.command {
            Commands::Search { mode, pick, term } => {
                assert_eq!(mode, "code");
                assert_eq!(pick, Some(2));
                assert_eq!(term, vec!["101"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["coursefind", "evict", "--ephemeral", "--json-logs"]).unwrap();
        assert!(cli.ephemeral);
        assert!(cli.json_logs);
    }

    #[test]
    fn test_locate_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["coursefind", "locate", "--lat", "34.0"]).is_err());
        let cli = Cli::try_parse_from(["coursefind", "locate", "--lat", "34.0", "--lon", "-118.2"]).unwrap();
        assert!(matches!(cli.command, Commands::Locate { lat: Some(_), lon: Some(_) }));
    }
}

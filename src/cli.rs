// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are no flags, just two positional arguments:
//
//   site-walker <ROOT_URL> [PARALLELISM]
//
// Logging is controlled with RUST_LOG instead (see main.rs).
// =============================================================================

use clap::Parser;

/// Default worker count for the command line. Higher than the library
/// default because a CLI run usually targets a whole site.
pub const CLI_PARALLELISM: usize = 200;

#[derive(Parser, Debug)]
#[command(
    name = "site-walker",
    version,
    about = "Crawl a website and list the links on every page",
    long_about = "site-walker starts at a site root, follows every link that stays on the same \
                  scheme, host and port, and prints each page it visited with the links it found. \
                  A summary goes to stderr."
)]
pub struct Cli {
    /// Site root to start from (e.g., https://example.com/)
    ///
    /// Must have no path beyond "/", no query and no fragment
    pub root_url: String,

    /// Number of pages fetched concurrently
    #[arg(default_value_t = CLI_PARALLELISM)]
    pub parallelism: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_only() {
        let cli = Cli::try_parse_from(["site-walker", "https://example.com/"]).unwrap();
        assert_eq!(cli.root_url, "https://example.com/");
        assert_eq!(cli.parallelism, CLI_PARALLELISM);
    }

    #[test]
    fn test_root_and_parallelism() {
        let cli = Cli::try_parse_from(["site-walker", "https://example.com/", "8"]).unwrap();
        assert_eq!(cli.parallelism, 8);
    }

    #[test]
    fn test_root_is_required() {
        assert!(Cli::try_parse_from(["site-walker"]).is_err());
    }

    #[test]
    fn test_parallelism_must_be_a_number() {
        assert!(Cli::try_parse_from(["site-walker", "https://example.com/", "many"]).is_err());
    }
}

//! CLI module for tollgate
//!
//! Provides command-line interface parsing and handling for the tollgate-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Smallest signing secret `generate-secret` will produce, in bytes.
pub const MIN_GENERATED_SECRET_BYTES: u16 = 32;

/// tollgate - Stateless bearer-token authentication gate
///
/// Verifies a signed bearer token on every request, keeps no sessions, and
/// issues tokens in exchange for configured credentials.
#[derive(Parser, Debug)]
#[command(
    name = "tollgate-server",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "tollgate - Stateless bearer-token authentication gate",
    long_about = "Verifies a signed bearer token on every request, keeps no sessions,\n\
                  and issues tokens in exchange for configured credentials.\n\n\
                  Run without arguments to start the server.",
    after_help = "EXAMPLES:\n    \
                  tollgate-server                                # Start the server (requires tollgate.toml)\n    \
                  tollgate-server --config my.toml               # Use a custom config file\n    \
                  tollgate-server generate-secret                # Print a new signing secret\n    \
                  tollgate-server hash-password 'hunter2'        # Hash a password for [[credentials.users]]\n    \
                  tollgate-server issue-token alice -a ROLE_USER # Mint a token for testing"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "tollgate.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (the default)
    Serve,

    /// Hash a password for the [[credentials.users]] table
    ///
    /// Cost parameters default to [credentials.hashing] from the config file
    /// when it exists, otherwise to the Argon2id defaults.
    HashPassword {
        /// Password to hash
        password: String,

        /// Argon2 memory cost in KiB
        #[arg(long)]
        memory_kib: Option<u32>,

        /// Argon2 iteration count
        #[arg(long)]
        iterations: Option<u32>,

        /// Argon2 degree of parallelism
        #[arg(long)]
        parallelism: Option<u32>,
    },

    /// Print a random hex-encoded signing secret
    GenerateSecret {
        /// Number of random bytes
        #[arg(long, default_value_t = 48, value_parser = clap::value_parser!(u16).range(MIN_GENERATED_SECRET_BYTES as i64..))]
        bytes: u16,
    },

    /// Issue a token with the configured secret and lifetime
    IssueToken {
        /// Subject the token is issued to
        subject: String,

        /// Authority to embed (repeatable)
        #[arg(short, long = "authority")]
        authorities: Vec<String>,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file, including the signing secret
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

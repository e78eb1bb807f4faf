//! Command-line argument parsing.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};

/// Injectionator CLI.
///
/// Authenticates this machine with Injectionator using a code you confirm
/// in a browser on any device.
#[derive(Parser, Debug)]
#[command(name = "n8r")]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print version.
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue)]
    pub version: bool,

    /// Enable verbose output.
    #[arg(long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Parses `args` (program name first), sending flags n8r does not define
    /// to [`Commands::External`] like any other unknown command.
    ///
    /// # Errors
    ///
    /// Returns the clap error for help output and other parse failures.
    pub fn parse_lenient<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        match Self::try_parse_from(&args) {
            Err(e) if e.kind() == ErrorKind::UnknownArgument => Ok(Self {
                command: Some(Commands::External(
                    args.iter()
                        .skip(1)
                        .map(|arg| arg.to_string_lossy().into_owned())
                        .collect(),
                )),
                version: false,
                verbose: false,
            }),
            parsed => parsed,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Authenticate with Injectionator.
    Login {
        /// Also open the verification page in the default browser.
        #[arg(long)]
        open: bool,

        /// Extra arguments are accepted and ignored.
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        _extra: Vec<String>,
    },

    /// Remove stored credentials.
    Logout {
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        _extra: Vec<String>,
    },

    /// Show authentication status.
    Status {
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        _extra: Vec<String>,
    },

    /// Print version.
    Version {
        #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
        _extra: Vec<String>,
    },

    /// Any other command. Only available once authenticated.
    #[command(external_subcommand)]
    External(Vec<String>),
}

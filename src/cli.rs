//! Command-line surface. Mirrors the teacher's pattern of a single
//! `#[derive(clap::Parser)]` struct assembled in one place, but flat -
//! `ldvi` has no subcommands, only flags, so there is no `build_cli()`
//! tree to walk the way `commands::build_cli()` does for `bcachefs`.

use clap::{Parser, ValueEnum};

use ldvi_core::codec::BinaryMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Native,
    Strict,
}

impl FormatArg {
    /// Parses a profile's free-form `format = "..."` string, case-
    /// insensitively; an unrecognized value is treated as absent rather
    /// than a hard error, since the CLI flag and the `native` default both
    /// remain available as a fallback.
    pub fn from_profile_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Some(FormatArg::Native),
            "strict" | "ldif" => Some(FormatArg::Strict),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BinaryModeArg {
    Ascii,
    Utf8,
    Junk,
}

impl From<BinaryModeArg> for BinaryMode {
    fn from(value: BinaryModeArg) -> Self {
        match value {
            BinaryModeArg::Ascii => BinaryMode::Ascii,
            BinaryModeArg::Utf8 => BinaryMode::Utf8,
            BinaryModeArg::Junk => BinaryMode::Junk,
        }
    }
}

/// Edit a set of directory entries in a text editor, then apply the diff.
#[derive(Debug, Parser)]
#[command(name = "ldvi", version, about)]
pub struct Cli {
    /// Search base. Repeatable. Fully replaces any profile-supplied bases
    /// rather than appending to them.
    #[arg(short = 'b', long = "base")]
    pub base: Vec<String>,

    /// LDAP search filter for the entries to edit.
    pub filter: Option<String>,

    /// Profile name to load from the profile file.
    #[arg(short = 'p', long = "profile", default_value = "default")]
    pub profile: String,

    /// Directory server host.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Directory server port.
    #[arg(long = "port")]
    pub port: Option<u16>,

    /// Bind DN for authentication.
    #[arg(short = 'D', long = "bind-dn")]
    pub bind_dn: Option<String>,

    /// Textual record format used for the edited document. Overrides the
    /// profile's `format` field when given; otherwise the profile's value
    /// is used, falling back to `native`.
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Controls which bytes a printer treats as safe to show unescaped.
    #[arg(long = "binary-mode", value_enum, default_value = "utf8")]
    pub binary_mode: BinaryModeArg,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity (only warnings and errors).
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

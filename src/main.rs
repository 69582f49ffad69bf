//! Entry point: parse arguments, merge them with the active profile, wire
//! up the process collaborators, and run one edit cycle. Mirrors the
//! teacher's `fn main() -> ExitCode` + `anyhow::Result::report()` idiom
//! (`src/bcachefs.rs`'s dispatch table) rather than `std::process::exit`.

mod cli;
mod config;
mod directory;
mod editor;
mod glue;
mod hasher;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;

use ldvi_core::codec::BinaryMode;
use ldvi_core::native::NativeFormat;
use ldvi_core::strict::StrictFormat;
use ldvi_core::{PrintConfig, RecordParser};

use cli::{Cli, FormatArg};
use config::{default_profile_path, load_profile};
use directory::NullDirectoryConnection;
use editor::{resolve_editor_command, ProcessEditor, StdinChooser};
use glue::{run_edit_cycle, DocumentFormat, GlueOutcome};
use hasher::SystemHasher;

/// The CLI flags merged with the active profile, per spec.md §6: search
/// bases from the CLI fully replace the profile's rather than appending.
struct ResolvedConfig {
    base: Vec<String>,
    bind_dn: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    editor: Option<String>,
    format: DocumentFormat,
    binary_mode: BinaryMode,
}

fn resolve_config(cli: &Cli, profile: &config::Profile) -> ResolvedConfig {
    let base = if cli.base.is_empty() { profile.base.clone() } else { cli.base.clone() };
    let format_arg = cli
        .format
        .or_else(|| profile.format.as_deref().and_then(FormatArg::from_profile_str))
        .unwrap_or(FormatArg::Native);
    let format = match format_arg {
        FormatArg::Native => DocumentFormat::Native,
        FormatArg::Strict => DocumentFormat::Strict,
    };
    ResolvedConfig {
        base,
        bind_dn: cli.bind_dn.clone().or_else(|| profile.bind_dn.clone()),
        host: cli.host.clone().or_else(|| profile.host.clone()),
        port: cli.port.or(profile.port),
        editor: profile.editor.clone(),
        format,
        binary_mode: cli.binary_mode.into(),
    }
}

fn run() -> Result<GlueOutcome> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let profile_path = default_profile_path().context("resolving the profile file path")?;
    let profile = load_profile(&profile_path, &cli.profile)?;
    let resolved = resolve_config(&cli, &profile);

    log::info!(
        "editing entries under {} base(s), profile {:?}",
        resolved.base.len(),
        cli.profile
    );

    let hasher = SystemHasher;
    let native_parser;
    let strict_parser;
    let parser: &dyn RecordParser = match resolved.format {
        DocumentFormat::Native => {
            native_parser = NativeFormat::new(&hasher);
            &native_parser
        }
        DocumentFormat::Strict => {
            strict_parser = StrictFormat::new();
            &strict_parser
        }
    };

    let print_config = PrintConfig { binary_mode: resolved.binary_mode };

    // A real backend would open one session and use it as both the entry
    // producer (search) and the change handler (dispatch) - see the module
    // doc comment on why that's a stand-in here. Since that session does
    // not exist in this build, the producer and handler are two unrelated
    // placeholder values rather than one value borrowed twice.
    let connection_config = directory::ConnectionConfig {
        host: resolved.host.clone(),
        port: resolved.port,
        bind_dn: resolved.bind_dn.clone(),
    };
    let mut producer = NullDirectoryConnection { config: connection_config.clone() };
    let mut handler = NullDirectoryConnection { config: connection_config };

    let editor_command = resolve_editor_command(resolved.editor.as_deref());
    let editor = ProcessEditor { command: editor_command };
    let chooser = StdinChooser;

    let scratch = tempfile::Builder::new()
        .prefix("ldvi-")
        .suffix(".txt")
        .tempfile()
        .context("creating the scratch file the editor will open")?;
    let scratch_path: PathBuf = scratch.path().to_path_buf();

    run_edit_cycle(
        &mut producer,
        parser,
        resolved.format,
        print_config,
        &mut handler,
        &editor,
        &chooser,
        &scratch_path,
    )
}

fn main() -> ExitCode {
    match run() {
        Ok(GlueOutcome::Success) => ExitCode::SUCCESS,
        Ok(GlueOutcome::Aborted) => {
            eprintln!("{}", "aborted by user".yellow());
            ExitCode::SUCCESS
        }
        Ok(GlueOutcome::HandlerFailure) => {
            eprintln!("{}", "a change was rejected partway through; earlier changes were not rolled back".red());
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("{}: {e:#}", "ldvi".red().bold());
            ExitCode::from(1)
        }
    }
}

//! The three process-launch collaborators the glue drives: an editor to
//! let the user revise the data document, a pager for diagnostics too long
//! for one screen, and a chooser for single-character prompts. All three
//! are out-of-scope for the core per spec - this module supplies the one
//! real implementation the binary uses, plus in-memory fakes for tests.

use std::io::Write as _;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Launches an external editor on a file, optionally seeking to a given
/// line number - used to return the user straight to a syntax/semantic
/// error after a failed diff.
pub trait Editor {
    fn edit(&self, path: &Path, line: Option<u64>) -> Result<()>;
}

/// Launches an external pager on a block of text.
pub trait Pager {
    fn page(&self, text: &str) -> Result<()>;
}

/// Prompts the user to pick one character from a legal set, returning
/// whichever one they chose.
pub trait Chooser {
    fn choose(&self, prompt: &str, legal: &[char]) -> Result<char>;
}

/// Resolves the editor command the way most CLI tools do: `$VISUAL`, then
/// `$EDITOR`, then a hardcoded fallback.
pub fn resolve_editor_command(configured: Option<&str>) -> String {
    if let Some(cmd) = configured {
        return cmd.to_string();
    }
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string())
}

/// Spawns `command path` (and, when `line` is given and the command looks
/// like a known editor, a `+line`-style argument) and waits for it to exit.
pub struct ProcessEditor {
    pub command: String,
}

impl Editor for ProcessEditor {
    fn edit(&self, path: &Path, line: Option<u64>) -> Result<()> {
        let mut cmd = Command::new(&self.command);
        if let Some(n) = line {
            cmd.arg(format!("+{n}"));
        }
        cmd.arg(path);
        let status = cmd.status().with_context(|| format!("launching editor {:?}", self.command))?;
        if !status.success() {
            bail!("editor {:?} exited with {}", self.command, status);
        }
        Ok(())
    }
}

pub struct ProcessPager {
    pub command: String,
}

impl Pager for ProcessPager {
    fn page(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.command)
            .stdin(std::process::Stdio::piped())
            .spawn()
            .with_context(|| format!("launching pager {:?}", self.command))?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        if !status.success() {
            bail!("pager {:?} exited with {}", self.command, status);
        }
        Ok(())
    }
}

/// Reads one line from stdin and accepts the first legal character in it,
/// case-insensitively; re-prompts on anything else.
pub struct StdinChooser;

impl Chooser for StdinChooser {
    fn choose(&self, prompt: &str, legal: &[char]) -> Result<char> {
        loop {
            eprint!("{prompt} ");
            std::io::stderr().flush().ok();
            let mut line = String::new();
            let n = std::io::stdin().read_line(&mut line)?;
            if n == 0 {
                bail!("input closed while waiting for a response");
            }
            if let Some(answer) = line.trim().chars().next() {
                let lower = answer.to_ascii_lowercase();
                if let Some(&matched) = legal.iter().find(|&&c| c.to_ascii_lowercase() == lower) {
                    return Ok(matched);
                }
            }
            eprintln!("please answer one of: {}", legal.iter().collect::<String>());
        }
    }
}

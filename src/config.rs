//! Profile configuration. A TOML file (default `~/.ldviprofile`) holding
//! one table per named profile, parsed with `serde` + `toml` - the
//! idiomatic choice across the retrieval pack for textual config, in place
//! of the original tool's own bespoke `~/.ldviprofiles` record format
//! (still readable as a native-format document through
//! [`ldvi_core::native::read_profile`] for anyone migrating an old file).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub base: Vec<String>,
    #[serde(default)]
    pub bind_dn: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

pub fn default_profile_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ldviprofile"))
}

/// Loads the named profile from `path`. A missing file is not an error -
/// it just means every field defaults to empty, matching how the CLI's own
/// flags are expected to carry the configuration instead.
pub fn load_profile(path: &Path, name: &str) -> Result<Profile> {
    if !path.exists() {
        return Ok(Profile::default());
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("reading profile file {}", path.display()))?;
    let profiles: HashMap<String, Profile> =
        toml::from_str(&text).with_context(|| format!("parsing profile file {}", path.display()))?;
    Ok(profiles.get(name).cloned().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_default_profile() {
        let profile = load_profile(Path::new("/nonexistent/.ldviprofile"), "default").unwrap();
        assert!(profile.base.is_empty());
    }

    #[test]
    fn loads_named_profile_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[default]\nbase = [\"dc=example,dc=com\"]\nhost = \"ldap.example.com\"\nport = 389\n"
        )
        .unwrap();
        let profile = load_profile(file.path(), "default").unwrap();
        assert_eq!(profile.base, vec!["dc=example,dc=com".to_string()]);
        assert_eq!(profile.host.as_deref(), Some("ldap.example.com"));
        assert_eq!(profile.port, Some(389));
    }

    #[test]
    fn unknown_profile_name_yields_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[default]\nbase = [\"dc=example,dc=com\"]\n").unwrap();
        let profile = load_profile(file.path(), "other").unwrap();
        assert!(profile.base.is_empty());
    }
}

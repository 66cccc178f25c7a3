// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// The file looked for in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "wordmastery.toml";

#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Path to the SQLite database holding mastery tables.
    pub database: PathBuf,
    /// Directory containing deck files.
    pub decks: PathBuf,
    /// How long a single load or save may take before it is abandoned.
    pub store_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("wordmastery.db"),
            decks: PathBuf::from("."),
            store_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Load the configuration. An explicit path must exist; otherwise the
    /// default file is used if present, and the defaults if not.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return fail(format!("config file {} does not exist.", path.display()));
                }
                log::debug!("Reading config from {}", path.display());
                Self::parse(&read_to_string(path)?)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    log::debug!("Reading config from {DEFAULT_CONFIG_FILE}");
                    Self::parse(&read_to_string(path)?)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        if config.store_timeout_ms == 0 {
            return fail("store_timeout_ms must be positive.");
        }
        Ok(config)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() -> Fallible<()> {
        assert_eq!(Config::parse("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_parse() -> Fallible<()> {
        let config = Config::parse(
            r#"
            database = "/var/lib/wordmastery/mastery.db"
            store_timeout_ms = 250
            "#,
        )?;
        assert_eq!(config.database, PathBuf::from("/var/lib/wordmastery/mastery.db"));
        assert_eq!(config.decks, PathBuf::from("."));
        assert_eq!(config.store_timeout(), Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::parse("databse = \"x.db\"").is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(Config::parse("store_timeout_ms = 0").is_err());
    }

    #[test]
    fn test_load_missing_explicit_path() -> Fallible<()> {
        let directory = tempdir()?;
        let result = Config::load(Some(&directory.path().join("nope.toml")));
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_load_explicit_path() -> Fallible<()> {
        let directory = tempdir()?;
        let path = directory.path().join("wordmastery.toml");
        write(&path, "decks = \"decks\"\n")?;
        let config = Config::load(Some(&path))?;
        assert_eq!(config.decks, PathBuf::from("decks"));
        Ok(())
    }
}

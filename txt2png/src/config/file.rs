//! Reading and writing the optional `config.ini`.
//!
//! The overlay runs fine without a config file: an absent file means every
//! setting keeps its built-in value. When present, the file is parsed by
//! [`super::parser`] and written back through [`super::writer`].

use ini::Ini;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::CONFIG_FILE_NAME;
use super::settings::ConfigFile;

/// Name of the per-user directory under `$HOME`.
const CONFIG_DIR_NAME: &str = ".txt2png";

/// Problems with the config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but is not readable INI
    #[error("cannot load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// A value is present but unusable
    #[error("bad value for {section}.{key} ('{value}'): {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// The directory holding the file could not be created
    #[error("cannot create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigFile {
    /// Settings from `~/.txt2png/config.ini`, or the built-in values when
    /// there is no such file.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Settings from `path`; a missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        match Ini::load_from_file(path) {
            Ok(ini) => super::parser::parse_ini(&ini),
            Err(ini::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigFileError::Load {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write these settings to `path`, creating missing parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| ConfigFileError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, super::writer::to_config_string(self)).map_err(|source| {
            ConfigFileError::Write {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Path of the user's config file, writing one with built-in values
    /// first if it is missing.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.is_file() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

/// `~/.txt2png`, or `./.txt2png` when no home directory is known.
pub fn config_directory() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(CONFIG_DIR_NAME),
        None => PathBuf::from(CONFIG_DIR_NAME),
    }
}

/// `~/.txt2png/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

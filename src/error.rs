//! Application error type shared by the settings loader, the measurement
//! store and the window bootstrap.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings file: {0}")]
    SettingsFormat(#[from] serde_json::Error),

    #[error("settings file is missing the `{0}` key")]
    MissingSetting(&'static str),

    #[error("measurement store error: {0}")]
    Store(#[from] csv::Error),

    #[error("the measurement store has {width} column(s), no room for the {field}")]
    NoColumnFor { field: &'static str, width: usize },

    #[error("window error: {0}")]
    Ui(#[from] eframe::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

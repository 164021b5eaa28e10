/*
 * Error Module
 *
 * Errors raised while building a simulation. Numeric edge cases inside a tick
 * are never errors; only setup mistakes (bad configuration, unreadable config
 * files) end up here.
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

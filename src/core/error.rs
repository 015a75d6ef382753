use thiserror::Error;

use crate::animation::AnimState;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    #[error("Character {character} has no {state:?} animation")]
    MissingAnimation { character: String, state: AnimState },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DuelError>;

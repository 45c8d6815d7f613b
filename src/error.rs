use std::{fmt, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum LecternError {
    #[error("Settings error: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("Content provider error: {0}")]
    Provider(String),
    #[error("Invalid verse reference: {0}")]
    Reference(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<io::Error> for LecternError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => LecternError::NotFound(format!("{x}")),
            _ => LecternError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<toml::de::Error> for LecternError {
    fn from(src: toml::de::Error) -> LecternError {
        LecternError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for LecternError {
    fn from(src: toml::ser::Error) -> LecternError {
        LecternError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for LecternError {
    fn from(src: JsonError) -> LecternError {
        LecternError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<fmt::Error> for LecternError {
    fn from(x: fmt::Error) -> Self {
        LecternError::Serialization(format!("{x}"))
    }
}

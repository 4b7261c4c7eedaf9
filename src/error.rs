use std::io;
use thiserror::Error;

/// Error returned by [`crate::Value::set`] when a raw argument cannot be stored.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("invalid boolean \"{0}\"")]
    InvalidBool(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
    #[error("{0}")]
    Custom(String),
}

impl ValueError {
    pub fn io<S: AsRef<str>>(path: S, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_string(),
            source,
        }
    }

    pub fn custom<S: AsRef<str>>(message: S) -> Self {
        Self::Custom(message.as_ref().to_string())
    }
}

/// A declared, non-optional positional slot that received no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required but not set: {slot}")]
pub struct MissingRequired {
    pub slot: String,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("flag provided but not defined: -{0}")]
    UnknownName(String),
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    #[error("flag needs an argument: -{0}")]
    ArgumentLacksParameter(String),
    #[error("invalid value \"{value}\" for flag -{name}: {source}")]
    InvalidValue {
        name: String,
        value: String,
        #[source]
        source: ValueError,
    },
    #[error("help requested")]
    Help,
    #[error(transparent)]
    MissingRequired(#[from] MissingRequired),
}

impl ParseError {
    /// Name of the missing positional slot, if this is a missing-required error.
    pub fn missing_slot(&self) -> Option<&str> {
        match self {
            Self::MissingRequired(MissingRequired { slot }) => Some(slot.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("flag redefined: {0}")]
    NameUsedMultipleTimes(String),
    #[error("flag name is empty")]
    EmptyName,
    #[error("flag {0:?} begins with -")]
    LeadingDash(String),
    #[error("flag {0:?} contains =")]
    ContainsEquals(String),
}

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("email must not be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email local part must not be empty")]
    EmptyLocalPart,
    #[error("email domain must not be empty")]
    EmptyDomain,
}

/// A syntactically valid email address: non-empty local part and domain
/// around a single `@`, within the RFC 5321 length cap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub const MAX_LENGTH: usize = 254;

    pub fn parse(value: &str) -> Result<Self, EmailError> {
        if value.is_empty() {
            return Err(EmailError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong { max: Self::MAX_LENGTH });
        }

        let at = value.find('@').ok_or(EmailError::MissingAtSymbol)?;
        if at == 0 {
            return Err(EmailError::EmptyLocalPart);
        }
        if at == value.len() - 1 {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

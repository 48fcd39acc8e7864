//! Type definitions for the Medix SDK

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message shown for any fault the user can only retry
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Try again!";

/// Service message for an access token past its lifetime
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token expired";

/// Service message for an access token the service does not recognise
pub const INVALID_ACCESS_TOKEN_MESSAGE: &str = "Invalid Access Token";

/// Availability of a practitioner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DoctorStatus {
    Unavailable,
    Available,
    Busy,
}

impl TryFrom<u8> for DoctorStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unavailable),
            1 => Ok(Self::Available),
            2 => Ok(Self::Busy),
            other => Err(format!("unknown doctor status {other}")),
        }
    }
}

impl From<DoctorStatus> for u8 {
    fn from(status: DoctorStatus) -> Self {
        match status {
            DoctorStatus::Unavailable => 0,
            DoctorStatus::Available => 1,
            DoctorStatus::Busy => 2,
        }
    }
}

impl fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unavailable => "unavailable",
            Self::Available => "available",
            Self::Busy => "busy",
        };
        f.write_str(label)
    }
}

/// One practitioner entry returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    /// Service identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Phone number, dialled as-is
    pub phone: String,

    /// Medical specialisation
    pub specialisation: String,

    /// Hospital the doctor works at
    pub hospital: String,

    /// District of the hospital
    pub district: String,

    /// Spoken languages, free-form
    pub languages: String,

    /// Current availability
    pub status: DoctorStatus,
}

/// Body of every listing response
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub result: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub doctors: Option<Vec<Doctor>>,
}

/// What an envelope asks the fetcher to do next
#[derive(Debug, PartialEq)]
pub(crate) enum Reply {
    Success(Vec<Doctor>),
    TokenExpired,
    InvalidToken,
    Failure(String),
}

impl Envelope {
    pub(crate) fn into_reply(self) -> Reply {
        match self.result.as_str() {
            "Success" => Reply::Success(self.doctors.unwrap_or_default()),
            "Failure" => match self.msg.as_deref() {
                Some(TOKEN_EXPIRED_MESSAGE) => Reply::TokenExpired,
                Some(INVALID_ACCESS_TOKEN_MESSAGE) => Reply::InvalidToken,
                Some(msg) if !msg.is_empty() => Reply::Failure(msg.to_string()),
                _ => Reply::Failure(GENERIC_FAILURE_MESSAGE.to_string()),
            },
            _ => Reply::Failure(GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }
}

/// Result of one authenticated fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The listing, in service order
    Success(Vec<Doctor>),
    /// The access token expired and could not be renewed
    AuthExpired,
    /// No session, or the session was terminated; the user must sign in
    AuthInvalid,
    /// Anything the user can retry later
    TransientFailure(String),
}

impl FetchOutcome {
    pub(crate) fn transient() -> Self {
        Self::TransientFailure(GENERIC_FAILURE_MESSAGE.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether the caller must route the user to sign-in
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::AuthInvalid)
    }
}

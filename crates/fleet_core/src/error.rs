use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which kind of record a key error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Vehicle,
    Driver,
    Location,
    Account,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Vehicle => "vehicle",
            RecordKind::Driver => "driver",
            RecordKind::Location => "location",
            RecordKind::Account => "account",
        })
    }
}

/// Failures reported by the fleet engines. All of them are local to the
/// structure that raised them and leave it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    #[error("{kind} `{id}` already exists")]
    DuplicateKey { kind: RecordKind, id: String },

    #[error("{kind} `{id}` not found")]
    NotFound { kind: RecordKind, id: String },

    #[error("driver queue is empty")]
    EmptyQueue,

    #[error("maintenance heap is empty")]
    EmptyHeap,

    #[error("maintenance heap is full (capacity {capacity})")]
    HeapFull { capacity: usize },

    #[error("directory is full (capacity {capacity})")]
    DirectoryFull { capacity: usize },

    #[error("location id {id} is out of range (network has {num_vertices} locations)")]
    InvalidVertex { id: usize, num_vertices: usize },

    #[error("no route from {from} to {to}")]
    NoRoute { from: String, to: String },

    #[error("invalid credentials for `{email}`")]
    InvalidCredentials { email: String },

    #[error("{kind} `{id}` is not available ({reason})")]
    Unavailable {
        kind: RecordKind,
        id: String,
        reason: String,
    },
}

impl FleetError {
    pub fn duplicate(kind: RecordKind, id: impl Into<String>) -> Self {
        FleetError::DuplicateKey {
            kind,
            id: id.into(),
        }
    }

    pub fn unavailable(
        kind: RecordKind,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FleetError::Unavailable {
            kind,
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        FleetError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Process exit status for this failure. Never zero; 1 and 2 are left to
    /// generic and usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            FleetError::DuplicateKey { .. } => 3,
            FleetError::NotFound { .. } => 4,
            FleetError::EmptyQueue | FleetError::EmptyHeap => 5,
            FleetError::HeapFull { .. } | FleetError::DirectoryFull { .. } => 6,
            FleetError::InvalidVertex { .. } => 7,
            FleetError::NoRoute { .. } => 8,
            FleetError::InvalidCredentials { .. } => 9,
            FleetError::Unavailable { .. } => 10,
        }
    }
}

pub type FleetResult<T> = Result<T, FleetError>;

/// Errors raised while loading configuration or seed data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_record() {
        let err = FleetError::duplicate(RecordKind::Vehicle, "V001");
        assert_eq!(err.to_string(), "vehicle `V001` already exists");

        let err = FleetError::not_found(RecordKind::Driver, "D009");
        assert_eq!(err.to_string(), "driver `D009` not found");

        let err = FleetError::unavailable(RecordKind::Vehicle, "V001", "driven by D001");
        assert_eq!(err.to_string(), "vehicle `V001` is not available (driven by D001)");
    }

    #[test]
    fn exit_codes_are_non_zero() {
        let errors = [
            FleetError::duplicate(RecordKind::Vehicle, "V1"),
            FleetError::not_found(RecordKind::Vehicle, "V1"),
            FleetError::EmptyQueue,
            FleetError::EmptyHeap,
            FleetError::HeapFull { capacity: 1 },
            FleetError::DirectoryFull { capacity: 1 },
            FleetError::InvalidVertex {
                id: 9,
                num_vertices: 2,
            },
            FleetError::NoRoute {
                from: "A".into(),
                to: "B".into(),
            },
            FleetError::InvalidCredentials {
                email: "x@y".into(),
            },
            FleetError::unavailable(RecordKind::Driver, "D1", "ON_DUTY"),
        ];
        for err in errors {
            assert!(err.exit_code() > 2, "{err} maps to {}", err.exit_code());
        }
    }
}

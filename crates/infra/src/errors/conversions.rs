//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;
use std::string::FromUtf8Error;

use faultline_domain::FaultlineError;
use prometheus::Error as PromError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FaultlineError);

impl From<InfraError> for FaultlineError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FaultlineError> for InfraError {
    fn from(value: FaultlineError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFaultlineError {
    fn into_faultline(self) -> FaultlineError;
}

/* -------------------------------------------------------------------------- */
/* prometheus::Error → FaultlineError */
/* -------------------------------------------------------------------------- */

impl IntoFaultlineError for PromError {
    fn into_faultline(self) -> FaultlineError {
        match self {
            PromError::AlreadyReg => {
                FaultlineError::Export("metric collector already registered".into())
            }
            PromError::InconsistentCardinality { expect, got } => FaultlineError::Export(
                format!("inconsistent label cardinality: expected {expect}, got {got}"),
            ),
            PromError::Msg(message) => FaultlineError::Export(message),
            PromError::Io(err) => FaultlineError::Export(format!("encoder I/O failure: {err}")),
            other => FaultlineError::Export(other.to_string()),
        }
    }
}

impl From<PromError> for InfraError {
    fn from(value: PromError) -> Self {
        InfraError(value.into_faultline())
    }
}

/* -------------------------------------------------------------------------- */
/* Encoded output → FaultlineError */
/* -------------------------------------------------------------------------- */

impl IntoFaultlineError for FromUtf8Error {
    fn into_faultline(self) -> FaultlineError {
        FaultlineError::Export(format!("exposition output is not UTF-8: {self}"))
    }
}

impl From<FromUtf8Error> for InfraError {
    fn from(value: FromUtf8Error) -> Self {
        InfraError(value.into_faultline())
    }
}

/* -------------------------------------------------------------------------- */
/* Config sources → FaultlineError */
/* -------------------------------------------------------------------------- */

impl IntoFaultlineError for IoError {
    fn into_faultline(self) -> FaultlineError {
        FaultlineError::Config(format!("Failed to read config file: {self}"))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_faultline())
    }
}

impl IntoFaultlineError for toml::de::Error {
    fn into_faultline(self) -> FaultlineError {
        FaultlineError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_faultline())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

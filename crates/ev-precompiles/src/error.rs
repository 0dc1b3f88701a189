//! Error types for custom precompile construction and invocation.

use crate::method::Selector;
use alloy_primitives::hex;
use revm::precompile::PrecompileError;
use thiserror::Error;

/// Reasons a single [`PrecompileMethod`](crate::PrecompileMethod) fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MethodError {
    /// The method signature is not exactly four bytes long.
    #[error("invalid method signature, expected 4 bytes, got {len}")]
    InvalidSignature {
        /// Length of the supplied signature.
        len: usize,
    },
    /// A state-mutating method was registered without a gas cost.
    #[error("invalid gas requirement, expected non-zero value")]
    MissingGasRequirement,
    /// No executor was attached to the method.
    #[error("missing executor")]
    MissingExecutor,
}

/// Configuration errors raised while building a
/// [`CustomPrecompile`](crate::CustomPrecompile).
///
/// These are programming errors in the host's precompile set. They never occur
/// at call time and should abort node startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// The precompile was given the zero address.
    #[error("invalid address")]
    InvalidAddress,
    /// The precompile has no callable methods.
    #[error("no methods registered")]
    NoMethodsRegistered,
    /// One of the methods failed validation.
    #[error("invalid method {}: {error}", hex::encode(.signature))]
    InvalidMethod {
        /// Raw signature bytes of the offending method.
        signature: Vec<u8>,
        /// The validation failure.
        error: MethodError,
    },
    /// Two methods share the same selector.
    #[error("duplicate method {selector}")]
    DuplicateMethod {
        /// The repeated selector.
        selector: Selector,
    },
}

/// Outcome of a failed precompile call.
///
/// Every variant is an expected result of untrusted call input and is reported
/// to the calling frame as a failed sub-call.
#[derive(Debug, Error)]
pub enum PrecompileCallError {
    /// The precompile exists but has been disabled by the host.
    #[error("the precompile contract is disabled")]
    DisabledPrecompile,
    /// Malformed input or an unknown selector.
    #[error("execution reverted")]
    ExecutionReverted,
    /// A state-mutating method was called from a read-only context.
    #[error("write protection")]
    WriteProtection,
    /// The supplied gas does not cover the method's cost.
    #[error("out of gas")]
    OutOfGas,
    /// A built-in precompile failed.
    #[error(transparent)]
    Precompile(PrecompileError),
    /// A built-in precompile hit an unrecoverable error.
    ///
    /// Unlike every other variant this does not describe a failed sub-call:
    /// the host must abort execution instead of resuming the calling frame.
    #[error("fatal precompile error: {0}")]
    Fatal(String),
    /// A custom method executor failed.
    #[error("{0}")]
    Custom(String),
}

impl PrecompileCallError {
    /// Creates an executor-defined failure.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Returns `true` if the host must abort execution.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl From<PrecompileError> for PrecompileCallError {
    fn from(err: PrecompileError) -> Self {
        match err {
            PrecompileError::OutOfGas => Self::OutOfGas,
            PrecompileError::Fatal(msg) => Self::Fatal(msg),
            other => Self::Precompile(other),
        }
    }
}

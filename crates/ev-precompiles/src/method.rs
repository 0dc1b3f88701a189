//! Method descriptors: the callable entry points of a custom precompile.

use crate::error::{MethodError, PrecompileCallError};
use alloy_primitives::{Address, Bytes, FixedBytes};
use alloy_sol_types::SolCall;
use std::{fmt, sync::Arc};

/// The 4-byte function selector that prefixes precompile calldata.
pub type Selector = FixedBytes<4>;

/// Length of a function selector in bytes.
pub const SELECTOR_LEN: usize = 4;

/// Reads the selector from the head of `input`, if there is one.
pub fn selector_of(input: &[u8]) -> Option<Selector> {
    input.get(..SELECTOR_LEN).map(Selector::from_slice)
}

/// Native implementation of a single precompile method.
///
/// `Ctx` is the host VM context lent to the executor for the duration of the
/// call. It gives access to state, further calls and chain parameters.
pub trait MethodExecutor<Ctx>: Send + Sync {
    /// Executes the method and returns its output.
    ///
    /// `input` is the full calldata, selector included.
    fn execute(
        &self,
        caller: Address,
        contract: Address,
        input: &[u8],
        ctx: &mut Ctx,
    ) -> Result<Bytes, PrecompileCallError>;
}

impl<Ctx, F> MethodExecutor<Ctx> for F
where
    F: Fn(Address, Address, &[u8], &mut Ctx) -> Result<Bytes, PrecompileCallError> + Send + Sync,
{
    fn execute(
        &self,
        caller: Address,
        contract: Address,
        input: &[u8],
        ctx: &mut Ctx,
    ) -> Result<Bytes, PrecompileCallError> {
        self(caller, contract, input, ctx)
    }
}

/// Describes one method of a custom precompile before it is registered.
///
/// Nothing is checked here; [`PrecompileMethod::validate`] runs once when the
/// owning [`CustomPrecompile`](crate::CustomPrecompile) is built.
pub struct PrecompileMethod<Ctx> {
    signature: Bytes,
    required_gas: u64,
    read_only: bool,
    executor: Option<Arc<dyn MethodExecutor<Ctx>>>,
}

impl<Ctx> PrecompileMethod<Ctx> {
    /// Creates a method without an executor.
    pub fn new(signature: impl Into<Bytes>, required_gas: u64, read_only: bool) -> Self {
        Self {
            signature: signature.into(),
            required_gas,
            read_only,
            executor: None,
        }
    }

    /// Creates a method whose selector is taken from a `sol!` call type.
    pub fn for_call<C: SolCall>(required_gas: u64, read_only: bool) -> Self {
        Self::new(Bytes::copy_from_slice(&C::SELECTOR), required_gas, read_only)
    }

    /// Attaches the executor.
    pub fn with_executor<E>(mut self, executor: E) -> Self
    where
        E: MethodExecutor<Ctx> + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Attaches an executor that is shared with other methods or precompiles.
    pub fn with_shared_executor(mut self, executor: Arc<dyn MethodExecutor<Ctx>>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Raw signature bytes as supplied by the host.
    pub const fn signature(&self) -> &Bytes {
        &self.signature
    }

    /// Gas charged before the executor runs.
    pub const fn required_gas(&self) -> u64 {
        self.required_gas
    }

    /// Whether the method leaves state untouched.
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Checks the method and returns its selector.
    ///
    /// Read-only methods may be free; state-mutating ones must charge gas.
    pub fn validate(&self) -> Result<Selector, MethodError> {
        if self.signature.len() != SELECTOR_LEN {
            return Err(MethodError::InvalidSignature {
                len: self.signature.len(),
            });
        }
        if !self.read_only && self.required_gas == 0 {
            return Err(MethodError::MissingGasRequirement);
        }
        if self.executor.is_none() {
            return Err(MethodError::MissingExecutor);
        }
        Ok(Selector::from_slice(&self.signature))
    }

    /// Validates the method and converts it into its registered form.
    pub(crate) fn into_registered(self) -> Result<RegisteredMethod<Ctx>, MethodError> {
        let selector = self.validate()?;
        let executor = self.executor.ok_or(MethodError::MissingExecutor)?;
        Ok(RegisteredMethod {
            selector,
            required_gas: self.required_gas,
            read_only: self.read_only,
            executor,
        })
    }
}

impl<Ctx> fmt::Debug for PrecompileMethod<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrecompileMethod")
            .field("signature", &self.signature)
            .field("required_gas", &self.required_gas)
            .field("read_only", &self.read_only)
            .field("has_executor", &self.executor.is_some())
            .finish()
    }
}

/// A validated method owned by a [`CustomPrecompile`](crate::CustomPrecompile).
pub(crate) struct RegisteredMethod<Ctx> {
    pub(crate) selector: Selector,
    pub(crate) required_gas: u64,
    pub(crate) read_only: bool,
    pub(crate) executor: Arc<dyn MethodExecutor<Ctx>>,
}

impl<Ctx> fmt::Debug for RegisteredMethod<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredMethod")
            .field("selector", &self.selector)
            .field("required_gas", &self.required_gas)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

/// Public view of a registered method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodInfo {
    /// The method selector.
    pub selector: Selector,
    /// Gas charged per call.
    pub required_gas: u64,
    /// Whether the method is callable from read-only contexts.
    pub read_only: bool,
}

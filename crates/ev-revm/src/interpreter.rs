//! Interpreter bridge for precompile calls.
//!
//! Custom precompiles go through `Resolve → GasCheck → ReadOnlyEnter →
//! Execute → ReadOnlyExit`; built-ins take the legacy revm path unchanged.

use crate::{
    evm::{EvCustomPrecompile, EvEvm},
    precompiles::EvPrecompile,
};
use alloy_primitives::{Address, Bytes};
use ev_precompiles::{PrecompileCallError, SELECTOR_LEN};
use revm::precompile::{PrecompileError, PrecompileFn};
use std::ops::{Deref, DerefMut};

/// Result of a precompile call as seen by the calling frame.
#[derive(Debug)]
pub struct PrecompileCall {
    /// Output bytes. Carries the revert data of a reverted built-in and is
    /// empty on any other failure.
    pub output: Bytes,
    /// Gas left for the caller after the call.
    pub remaining_gas: u64,
    /// Gas refund reported by a successful built-in; 0 otherwise.
    pub gas_refunded: i64,
    /// Why the call failed, if it did.
    pub error: Option<PrecompileCallError>,
}

impl PrecompileCall {
    /// A successful call.
    pub const fn success(output: Bytes, remaining_gas: u64) -> Self {
        Self {
            output,
            remaining_gas,
            gas_refunded: 0,
            error: None,
        }
    }

    /// A failed call.
    pub fn failure(error: PrecompileCallError, remaining_gas: u64) -> Self {
        Self {
            output: Bytes::new(),
            remaining_gas,
            gas_refunded: 0,
            error: Some(error),
        }
    }

    /// Returns `true` if the call succeeded.
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns `true` if the host must abort execution rather than resume the
    /// calling frame.
    pub fn is_fatal(&self) -> bool {
        self.error.as_ref().is_some_and(PrecompileCallError::is_fatal)
    }

    /// Splits the call into output or error, dropping the gas figures.
    pub fn into_result(self) -> Result<Bytes, PrecompileCallError> {
        match self.error {
            None => Ok(self.output),
            Some(err) => Err(err),
        }
    }
}

/// Promotes the EVM to read-only for the lifetime of the guard.
///
/// The guard derefs to the EVM so executors run against the promoted state.
/// Only a guard that performed the promotion demotes on drop, so an outer
/// read-only frame is never made writable by a nested call.
#[derive(Debug)]
pub(crate) struct ReadOnlyGuard<'a, H> {
    evm: &'a mut EvEvm<H>,
    promoted: bool,
}

impl<'a, H> ReadOnlyGuard<'a, H> {
    pub(crate) fn enter(evm: &'a mut EvEvm<H>, requested: bool) -> Self {
        let promoted = requested && !evm.is_read_only();
        if promoted {
            tracing::trace!(target: "ev_revm::interpreter", "entering read-only mode");
            evm.set_read_only(true);
        }
        Self { evm, promoted }
    }
}

impl<H> Deref for ReadOnlyGuard<'_, H> {
    type Target = EvEvm<H>;

    fn deref(&self) -> &Self::Target {
        self.evm
    }
}

impl<H> DerefMut for ReadOnlyGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.evm
    }
}

impl<H> Drop for ReadOnlyGuard<'_, H> {
    fn drop(&mut self) {
        if self.promoted {
            tracing::trace!(target: "ev_revm::interpreter", "leaving read-only mode");
            self.evm.set_read_only(false);
        }
    }
}

/// Per-call-stack view over an [`EvEvm`] that executes precompile calls.
#[derive(Debug)]
pub struct EvInterpreter<'a, H> {
    evm: &'a mut EvEvm<H>,
}

impl<'a, H> EvInterpreter<'a, H> {
    /// Creates an interpreter over `evm`.
    pub fn new(evm: &'a mut EvEvm<H>) -> Self {
        Self { evm }
    }

    /// Returns `true` while the interpreter forbids state mutation.
    pub fn is_read_only(&self) -> bool {
        self.evm.is_read_only()
    }

    /// Sets the read-only flag, as the host does when entering a static frame.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.evm.set_read_only(read_only);
    }

    /// The EVM this interpreter runs on.
    pub fn evm(&self) -> &EvEvm<H> {
        self.evm
    }

    /// Mutable access to the EVM this interpreter runs on.
    pub fn evm_mut(&mut self) -> &mut EvEvm<H> {
        self.evm
    }

    /// Calls the precompile at `address`, or returns `None` if there is none.
    pub fn call_precompile(
        &mut self,
        caller: Address,
        address: Address,
        input: &[u8],
        supplied_gas: u64,
        read_only: bool,
    ) -> Option<PrecompileCall> {
        let precompile = self.evm.precompile(&address)?;
        Some(self.run_precompiled_contract(caller, &precompile, input, supplied_gas, read_only))
    }

    /// Runs `precompile` with `supplied_gas`.
    ///
    /// For custom precompiles:
    /// - disabled: fails with the full supplied gas returned;
    /// - input shorter than a selector or insufficient gas: fails with no gas
    ///   left;
    /// - otherwise the method's gas is charged up front and the executor runs
    ///   against the EVM with the read-only flag promoted if `read_only` is
    ///   requested. Executor errors come back with the gas left after that
    ///   charge.
    ///
    /// The call depth is left untouched.
    pub fn run_precompiled_contract(
        &mut self,
        caller: Address,
        precompile: &EvPrecompile<H>,
        input: &[u8],
        supplied_gas: u64,
        read_only: bool,
    ) -> PrecompileCall {
        let contract = match precompile {
            EvPrecompile::BuiltIn(f) => return run_builtin(*f, input, supplied_gas),
            EvPrecompile::Custom(contract) => contract,
        };
        self.run_custom(caller, contract, input, supplied_gas, read_only)
    }

    fn run_custom(
        &mut self,
        caller: Address,
        contract: &EvCustomPrecompile<H>,
        input: &[u8],
        supplied_gas: u64,
        read_only: bool,
    ) -> PrecompileCall {
        if contract.is_disabled() {
            tracing::warn!(
                target: "ev_revm::interpreter",
                address = ?contract.address(),
                name = contract.name(),
                ?caller,
                "call to disabled precompile"
            );
            return PrecompileCall::failure(PrecompileCallError::DisabledPrecompile, supplied_gas);
        }

        if input.len() < SELECTOR_LEN {
            return PrecompileCall::failure(PrecompileCallError::ExecutionReverted, 0);
        }

        let gas_cost = contract.required_gas(input);
        let Some(remaining_gas) = supplied_gas.checked_sub(gas_cost) else {
            tracing::debug!(
                target: "ev_revm::interpreter",
                address = ?contract.address(),
                gas_cost,
                supplied_gas,
                "precompile call out of gas"
            );
            return PrecompileCall::failure(PrecompileCallError::OutOfGas, 0);
        };

        tracing::debug!(
            target: "ev_revm::interpreter",
            address = ?contract.address(),
            name = contract.name(),
            ?caller,
            gas_cost,
            remaining_gas,
            read_only,
            depth = self.evm.depth(),
            "running custom precompile"
        );

        let mut evm = ReadOnlyGuard::enter(self.evm, read_only);
        let effective_read_only = evm.is_read_only();
        let result = contract.run_custom(caller, input, effective_read_only, &mut evm);
        drop(evm);

        match result {
            Ok(output) => PrecompileCall::success(output, remaining_gas),
            Err(err) => PrecompileCall::failure(err, remaining_gas),
        }
    }
}

/// Legacy path for built-in precompiles.
///
/// A reverted output keeps its data and the unused gas. Errors consume the
/// whole budget, as for any failed precompile; fatal errors are flagged for
/// the host to abort on.
fn run_builtin(precompile: PrecompileFn, input: &[u8], supplied_gas: u64) -> PrecompileCall {
    match precompile(input, supplied_gas) {
        Ok(output) => {
            let remaining_gas = supplied_gas.saturating_sub(output.gas_used);
            if output.reverted {
                return PrecompileCall {
                    output: output.bytes,
                    remaining_gas,
                    gas_refunded: 0,
                    error: Some(PrecompileCallError::ExecutionReverted),
                };
            }
            PrecompileCall {
                output: output.bytes,
                remaining_gas,
                gas_refunded: output.gas_refunded,
                error: None,
            }
        }
        Err(PrecompileError::Fatal(msg)) => {
            tracing::error!(
                target: "ev_revm::interpreter",
                %msg,
                "fatal built-in precompile error"
            );
            PrecompileCall::failure(PrecompileCallError::Fatal(msg), 0)
        }
        Err(err) => PrecompileCall::failure(err.into(), 0),
    }
}

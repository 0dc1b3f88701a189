//! Selector dispatch for custom precompiles.

use crate::{contract::CustomPrecompile, error::PrecompileCallError, method::selector_of};
use alloy_primitives::{Address, Bytes};

impl<Ctx> CustomPrecompile<Ctx> {
    /// Runs the method selected by `input` on behalf of `caller`.
    ///
    /// The caller is expected to have rejected inputs shorter than a selector
    /// and to have charged [`Self::required_gas`] already. With `read_only`
    /// set, state-mutating methods fail with
    /// [`PrecompileCallError::WriteProtection`] without reaching their
    /// executor. The executor's result is returned unchanged.
    pub fn run_custom(
        &self,
        caller: Address,
        input: &[u8],
        read_only: bool,
        ctx: &mut Ctx,
    ) -> Result<Bytes, PrecompileCallError> {
        let Some(selector) = selector_of(input) else {
            return Err(PrecompileCallError::ExecutionReverted);
        };

        let Some(method) = self.method(&selector) else {
            tracing::warn!(
                target: "ev_precompiles::dispatch",
                precompile = %self.name(),
                address = ?self.address(),
                %selector,
                "unknown selector"
            );
            return Err(PrecompileCallError::ExecutionReverted);
        };

        if read_only && !method.read_only {
            tracing::warn!(
                target: "ev_precompiles::dispatch",
                precompile = %self.name(),
                ?caller,
                %selector,
                "write attempted in read-only context"
            );
            return Err(PrecompileCallError::WriteProtection);
        }

        tracing::debug!(
            target: "ev_precompiles::dispatch",
            precompile = %self.name(),
            ?caller,
            %selector,
            read_only,
            calldata_len = input.len(),
            "dispatching precompile method"
        );
        method.executor.execute(caller, self.address(), input, ctx)
    }

    /// Context-free entry point shared with built-in precompiles.
    ///
    /// # Panics
    ///
    /// Always. Custom precompiles need the caller, the read-only flag and the
    /// VM context; reaching this is an integration bug in the host.
    pub fn run(&self, _input: &[u8]) -> Result<Bytes, PrecompileCallError> {
        panic!(
            "custom precompile {} at {} must be invoked through run_custom",
            self.name(),
            self.address()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrecompileMethod;
    use alloy_primitives::{address, bytes, Bytes};

    const PRECOMPILE: Address = address!("0xaa00000000000000000000000000000000000001");
    const CALLER: Address = address!("0x00000000000000000000000000000000000000ca");

    /// Test context recording every executor invocation.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<(Address, Address, Bytes)>,
    }

    fn record(
        caller: Address,
        contract: Address,
        input: &[u8],
        ctx: &mut Recorder,
    ) -> Result<Bytes, PrecompileCallError> {
        ctx.calls.push((caller, contract, Bytes::copy_from_slice(input)));
        Ok(bytes!("0x01"))
    }

    fn fail(
        _: Address,
        _: Address,
        _: &[u8],
        _: &mut Recorder,
    ) -> Result<Bytes, PrecompileCallError> {
        Err(PrecompileCallError::custom("insufficient balance"))
    }

    fn precompile() -> CustomPrecompile<Recorder> {
        CustomPrecompile::new(
            PRECOMPILE,
            [
                PrecompileMethod::new(bytes!("0x12345678"), 100, true).with_executor(record),
                PrecompileMethod::new(bytes!("0x87654321"), 5_000, false).with_executor(record),
                PrecompileMethod::new(bytes!("0x0badf00d"), 5_000, false).with_executor(fail),
            ],
            "recorder",
        )
    }

    #[test]
    fn routes_to_matching_method() {
        let precompile = precompile();
        let mut ctx = Recorder::default();
        let input = bytes!("0x87654321cafe");

        let output = precompile
            .run_custom(CALLER, &input, false, &mut ctx)
            .expect("write call succeeds");

        assert_eq!(output, bytes!("0x01"));
        assert_eq!(ctx.calls, vec![(CALLER, PRECOMPILE, input)]);
    }

    #[test]
    fn read_only_method_runs_in_read_only_context() {
        let precompile = precompile();
        let mut ctx = Recorder::default();

        let result = precompile.run_custom(CALLER, &bytes!("0x12345678"), true, &mut ctx);

        assert!(result.is_ok());
        assert_eq!(ctx.calls.len(), 1);
    }

    #[test]
    fn write_in_read_only_context_never_reaches_executor() {
        let precompile = precompile();
        let mut ctx = Recorder::default();

        let result = precompile.run_custom(CALLER, &bytes!("0x87654321"), true, &mut ctx);

        assert!(matches!(result, Err(PrecompileCallError::WriteProtection)));
        assert!(ctx.calls.is_empty(), "executor must not be invoked");
    }

    #[test]
    fn unknown_selector_reverts() {
        let precompile = precompile();
        let mut ctx = Recorder::default();

        let result = precompile.run_custom(CALLER, &bytes!("0xffffffff"), false, &mut ctx);

        assert!(matches!(result, Err(PrecompileCallError::ExecutionReverted)));
        assert!(ctx.calls.is_empty());
    }

    #[test]
    fn short_input_reverts_instead_of_panicking() {
        let precompile = precompile();
        let mut ctx = Recorder::default();

        let result = precompile.run_custom(CALLER, &bytes!("0x1234"), false, &mut ctx);

        assert!(matches!(result, Err(PrecompileCallError::ExecutionReverted)));
    }

    #[test]
    fn executor_errors_pass_through() {
        let precompile = precompile();
        let mut ctx = Recorder::default();

        let result = precompile.run_custom(CALLER, &bytes!("0x0badf00d"), false, &mut ctx);

        match result {
            Err(PrecompileCallError::Custom(msg)) => assert_eq!(msg, "insufficient balance"),
            other => panic!("expected executor error, got {other:?}"),
        }
    }

    #[test]
    fn closures_are_executors() {
        let precompile = CustomPrecompile::new(
            PRECOMPILE,
            [PrecompileMethod::new(bytes!("0x12345678"), 0, true).with_executor(
                |caller: Address,
                 _: Address,
                 _: &[u8],
                 _: &mut ()|
                 -> Result<Bytes, PrecompileCallError> {
                    Ok(Bytes::copy_from_slice(caller.as_slice()))
                },
            )],
            "echo-caller",
        );

        let output = precompile
            .run_custom(CALLER, &bytes!("0x12345678"), true, &mut ())
            .expect("view call succeeds");
        assert_eq!(&output[..], CALLER.as_slice());
    }

    #[test]
    #[should_panic(expected = "must be invoked through run_custom")]
    fn bare_run_is_unsupported() {
        let _ = precompile().run(&bytes!("0x12345678"));
    }
}

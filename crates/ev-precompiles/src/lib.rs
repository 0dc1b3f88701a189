//! # Evolve Custom Precompiled Contracts
//!
//! This crate lets a host chain describe native "precompiled" contracts that
//! live at fixed addresses and expose several methods, each selected by the
//! 4-byte selector at the head of the calldata.
//!
//! ## Building Blocks
//!
//! | Type | Role |
//! |------|------|
//! | [`PrecompileMethod`] | One entry point: selector, gas cost, mutability, executor |
//! | [`CustomPrecompile`] | A named precompile at an address, built from validated methods |
//! | [`CustomPrecompile::run_custom`] | Selector dispatch with read-only enforcement |
//!
//! ## Lifecycle
//!
//! 1. **Describe**: the host builds [`PrecompileMethod`]s and attaches a
//!    [`MethodExecutor`] to each.
//! 2. **Validate**: [`CustomPrecompile::new`] checks every method once. An
//!    invalid set (zero address, no methods, malformed selector, free
//!    state-mutating method, missing executor, duplicate selector) aborts.
//! 3. **Dispatch**: at call time the interpreter charges
//!    [`CustomPrecompile::required_gas`] and calls
//!    [`CustomPrecompile::run_custom`].
//!
//! Gas accounting, the disabled flag and read-only promotion around a call
//! are owned by the interpreter bridge in `ev-revm`.
//!
//! ```ignore
//! use ev_precompiles::{CustomPrecompile, PrecompileMethod};
//!
//! let registry = CustomPrecompile::new(
//!     REGISTRY_ADDR,
//!     [
//!         PrecompileMethod::for_call::<IRegistry::lookupCall>(0, true).with_executor(lookup),
//!         PrecompileMethod::for_call::<IRegistry::registerCall>(20_000, false)
//!             .with_executor(register),
//!     ],
//!     "registry",
//! );
//! ```

mod contract;
mod dispatch;
pub mod error;
pub mod method;

pub use contract::CustomPrecompile;
pub use error::{ConstructionError, MethodError, PrecompileCallError};
pub use method::{
    selector_of, MethodExecutor, MethodInfo, PrecompileMethod, Selector, SELECTOR_LEN,
};

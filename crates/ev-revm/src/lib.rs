//! Interpreter bridge for Evolve custom precompiles on top of `revm`.
//!
//! [`EvEvm`] owns the host context and the precompile set, [`EvInterpreter`]
//! runs calls against it, and [`CustomPrecompilesConfig`] switches
//! registered precompiles off at startup.

pub mod config;
pub mod evm;
pub mod interpreter;
pub mod precompiles;

pub use config::{CustomPrecompilesConfig, ConfigError, DISABLED_PRECOMPILES_ENV};
pub use evm::{EvCustomPrecompile, EvEvm};
pub use interpreter::{EvInterpreter, PrecompileCall};
pub use precompiles::{EvPrecompile, EvPrecompiles};

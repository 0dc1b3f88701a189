//! EV-specific EVM wrapper that carries the custom precompile set.

use crate::{
    interpreter::EvInterpreter,
    precompiles::{EvPrecompile, EvPrecompiles},
};
use alloy_primitives::Address;
use ev_precompiles::CustomPrecompile;
use revm::primitives::hardfork::SpecId;
use std::sync::Arc;

/// A custom precompile whose executors run against an [`EvEvm`].
pub type EvCustomPrecompile<H> = CustomPrecompile<EvEvm<H>>;

/// An EVM instance as seen by precompile calls.
///
/// Owns the host context `H`, the precompile set, the current call depth and
/// the interpreter's read-only flag. Custom precompile executors receive the
/// whole `EvEvm`, so nested work they perform observes the read-only state of
/// the call that reached them. The custom precompile set is installed during
/// setup, before any call is dispatched.
#[derive(Debug)]
pub struct EvEvm<H> {
    host: H,
    precompiles: EvPrecompiles<H>,
    depth: usize,
    read_only: bool,
}

impl<H> EvEvm<H> {
    /// Creates an EVM with revm's built-in precompiles for `spec`.
    pub fn new(host: H, spec: SpecId) -> Self {
        Self {
            host,
            precompiles: EvPrecompiles::new(spec),
            depth: 0,
            read_only: false,
        }
    }

    /// Sets the starting call depth.
    pub const fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Installs `contracts` as the complete custom precompile set.
    ///
    /// Any previously registered custom precompiles are dropped. Pass shared
    /// handles (`Arc<EvCustomPrecompile<H>>`) to keep toggling them later.
    pub fn with_custom_precompiled_contracts<I>(&mut self, contracts: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<EvCustomPrecompile<H>>>,
    {
        self.precompiles.set_custom(contracts);
        self
    }

    /// Addresses currently registered as custom precompiles.
    ///
    /// The order is unspecified.
    pub fn custom_precompiled_contract_addresses(&self) -> Vec<Address> {
        self.precompiles.custom_addresses()
    }

    /// Resolves the precompile at `address`.
    pub fn precompile(&self, address: &Address) -> Option<EvPrecompile<H>> {
        self.precompiles.get(address)
    }

    /// The precompile set.
    pub const fn precompiles(&self) -> &EvPrecompiles<H> {
        &self.precompiles
    }

    /// Mutable access to the precompile set.
    pub fn precompiles_mut(&mut self) -> &mut EvPrecompiles<H> {
        &mut self.precompiles
    }

    /// The host context.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host context.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the EVM and returns the host context.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Current call depth.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Sets the current call depth.
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Returns `true` while state mutation is forbidden.
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Sets the read-only flag, as the host does when entering a static frame.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Creates an interpreter over this EVM.
    pub fn interpreter(&mut self) -> EvInterpreter<'_, H> {
        EvInterpreter::new(self)
    }
}

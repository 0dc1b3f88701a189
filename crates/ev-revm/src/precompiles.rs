//! Address lookup over the built-in and custom precompile sets.

use crate::evm::EvCustomPrecompile;
use alloy_primitives::Address;
use revm::{
    precompile::{PrecompileFn, PrecompileSpecId, Precompiles},
    primitives::hardfork::SpecId,
};
use std::{collections::HashMap, fmt, sync::Arc};

/// A precompile resolved for a call.
///
/// The variant is fixed when the precompile is registered, so the interpreter
/// bridge picks the execution path with a plain match.
pub enum EvPrecompile<H> {
    /// A built-in precompile executed through the legacy path.
    BuiltIn(PrecompileFn),
    /// A host-supplied precompile dispatched by selector.
    Custom(Arc<EvCustomPrecompile<H>>),
}

impl<H> EvPrecompile<H> {
    /// Returns the custom precompile, if this is one.
    pub const fn as_custom(&self) -> Option<&Arc<EvCustomPrecompile<H>>> {
        match self {
            Self::Custom(precompile) => Some(precompile),
            Self::BuiltIn(_) => None,
        }
    }
}

impl<H> Clone for EvPrecompile<H> {
    fn clone(&self) -> Self {
        match self {
            Self::BuiltIn(f) => Self::BuiltIn(*f),
            Self::Custom(precompile) => Self::Custom(Arc::clone(precompile)),
        }
    }
}

impl<H> fmt::Debug for EvPrecompile<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuiltIn(_) => f.write_str("BuiltIn"),
            Self::Custom(precompile) => f.debug_tuple("Custom").field(precompile).finish(),
        }
    }
}

/// The precompiles visible to one EVM instance.
///
/// Built-ins come from revm's set for the active [`SpecId`] plus any extra
/// functions the host installs. Custom precompiles are replaced as a whole by
/// [`EvPrecompiles::set_custom`]. A custom precompile registered at a
/// built-in address takes precedence.
pub struct EvPrecompiles<H> {
    builtins: &'static Precompiles,
    extra_builtins: HashMap<Address, PrecompileFn>,
    custom: HashMap<Address, Arc<EvCustomPrecompile<H>>>,
}

impl<H> EvPrecompiles<H> {
    /// Creates the set with revm's built-ins for `spec` and no custom precompiles.
    pub fn new(spec: SpecId) -> Self {
        Self {
            builtins: Precompiles::new(PrecompileSpecId::from_spec_id(spec)),
            extra_builtins: HashMap::new(),
            custom: HashMap::new(),
        }
    }

    /// Installs an additional built-in precompile.
    pub fn insert_builtin(&mut self, address: Address, precompile: PrecompileFn) {
        self.extra_builtins.insert(address, precompile);
    }

    /// Replaces every custom precompile with `contracts`.
    ///
    /// A later contract at an address already used in `contracts` replaces the
    /// earlier one.
    pub fn set_custom<I>(&mut self, contracts: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<EvCustomPrecompile<H>>>,
    {
        let contracts = contracts.into_iter();
        let mut custom = HashMap::with_capacity(contracts.size_hint().0);
        for contract in contracts {
            let contract: Arc<EvCustomPrecompile<H>> = contract.into();
            let address = contract.address();
            if self.builtin(&address).is_some() {
                tracing::warn!(
                    target: "ev_revm::precompiles",
                    ?address,
                    name = contract.name(),
                    "custom precompile shadows a built-in precompile"
                );
            }
            if let Some(previous) = custom.insert(address, contract) {
                tracing::warn!(
                    target: "ev_revm::precompiles",
                    ?address,
                    replaced = previous.name(),
                    "duplicate custom precompile address"
                );
            }
        }

        tracing::info!(
            target: "ev_revm::precompiles",
            count = custom.len(),
            previous = self.custom.len(),
            "installed custom precompiles"
        );
        self.custom = custom;
    }

    /// Resolves the precompile at `address`.
    pub fn get(&self, address: &Address) -> Option<EvPrecompile<H>> {
        if let Some(precompile) = self.custom.get(address) {
            return Some(EvPrecompile::Custom(Arc::clone(precompile)));
        }
        self.builtin(address).map(EvPrecompile::BuiltIn)
    }

    /// Returns `true` if any precompile lives at `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.custom.contains_key(address) || self.builtin(address).is_some()
    }

    /// Returns the custom precompile at `address`.
    pub fn custom(&self, address: &Address) -> Option<&Arc<EvCustomPrecompile<H>>> {
        self.custom.get(address)
    }

    /// Addresses of all registered custom precompiles, in no particular order.
    pub fn custom_addresses(&self) -> Vec<Address> {
        self.custom.keys().copied().collect()
    }

    /// Iterates the registered custom precompiles, in no particular order.
    pub fn custom_precompiles(&self) -> impl Iterator<Item = &Arc<EvCustomPrecompile<H>>> + '_ {
        self.custom.values()
    }

    fn builtin(&self, address: &Address) -> Option<PrecompileFn> {
        self.extra_builtins
            .get(address)
            .copied()
            .or_else(|| self.builtins.get(address).map(|p| *p.precompile()))
    }
}

impl<H> fmt::Debug for EvPrecompiles<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvPrecompiles")
            .field("extra_builtins", &self.extra_builtins.keys().collect::<Vec<_>>())
            .field("custom", &self.custom)
            .finish_non_exhaustive()
    }
}

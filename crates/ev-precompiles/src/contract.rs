//! Registry entries: named, addressed precompiles built from validated methods.

use crate::{
    error::ConstructionError,
    method::{selector_of, MethodInfo, PrecompileMethod, RegisteredMethod, Selector},
};
use alloy_primitives::Address;
use std::{
    collections::HashSet,
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

/// A precompiled contract supplied by the host chain.
///
/// Calls are routed to one of its methods by the 4-byte selector at the head
/// of the calldata. Apart from the `disabled` flag the contract is immutable
/// once built.
pub struct CustomPrecompile<Ctx> {
    name: String,
    address: Address,
    pub(crate) methods: Vec<RegisteredMethod<Ctx>>,
    disabled: AtomicBool,
}

impl<Ctx> CustomPrecompile<Ctx> {
    /// Builds a precompile at `address` from `methods`.
    ///
    /// # Panics
    ///
    /// Panics on any [`ConstructionError`]. An invalid precompile set is a
    /// configuration bug and must abort startup; use [`Self::try_new`] to
    /// inspect the failure instead.
    pub fn new(
        address: Address,
        methods: impl IntoIterator<Item = PrecompileMethod<Ctx>>,
        name: impl Into<String>,
    ) -> Self {
        match Self::try_new(address, methods, name) {
            Ok(precompile) => precompile,
            Err(err) => panic!("{err}"),
        }
    }

    /// Builds a precompile at `address` from `methods`, reporting the first
    /// configuration error found.
    pub fn try_new(
        address: Address,
        methods: impl IntoIterator<Item = PrecompileMethod<Ctx>>,
        name: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        if address.is_zero() {
            return Err(ConstructionError::InvalidAddress);
        }

        let methods = methods.into_iter();
        let mut registered = Vec::with_capacity(methods.size_hint().0);
        let mut seen = HashSet::<Selector>::new();
        for method in methods {
            let signature = method.signature().to_vec();
            let method = method
                .into_registered()
                .map_err(|error| ConstructionError::InvalidMethod { signature, error })?;
            if !seen.insert(method.selector) {
                return Err(ConstructionError::DuplicateMethod {
                    selector: method.selector,
                });
            }
            registered.push(method);
        }

        if registered.is_empty() {
            return Err(ConstructionError::NoMethodsRegistered);
        }

        Ok(Self {
            name: name.into(),
            address,
            methods: registered,
            disabled: AtomicBool::new(false),
        })
    }

    /// Human-readable label of the precompile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address the precompile is installed at.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Gas charged for calling the method selected by `input`.
    ///
    /// Returns 0 when no method matches, including for inputs shorter than a
    /// selector. A 0 result therefore means "unmatched or free", never "cheap".
    pub fn required_gas(&self, input: &[u8]) -> u64 {
        selector_of(input)
            .and_then(|selector| self.method(&selector))
            .map_or(0, |method| method.required_gas)
    }

    /// Sets the disabled flag and returns the precompile.
    pub fn with_disabled(self, disabled: bool) -> Self {
        self.set_disabled(disabled);
        self
    }

    /// Sets the disabled flag on a shared precompile.
    ///
    /// The flag is read once per call before dispatch. Toggling it while a
    /// call to this precompile is in flight needs external synchronization.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Relaxed);
    }

    /// Whether the precompile currently refuses calls.
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Registered methods in registration order.
    pub fn methods(&self) -> impl Iterator<Item = MethodInfo> + '_ {
        self.methods.iter().map(|method| MethodInfo {
            selector: method.selector,
            required_gas: method.required_gas,
            read_only: method.read_only,
        })
    }

    pub(crate) fn method(&self, selector: &Selector) -> Option<&RegisteredMethod<Ctx>> {
        self.methods.iter().find(|method| method.selector == *selector)
    }
}

impl<Ctx> fmt::Debug for CustomPrecompile<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPrecompile")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("methods", &self.methods)
            .field("disabled", &self.is_disabled())
            .finish()
    }
}

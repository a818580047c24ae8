use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use rtmock_primitives::{Declaration, MockDeclaration};

use crate::config::SynthesisConfig;
use crate::constants::DEFAULT_ATTRIBUTE;
use crate::error::SynthesisError;
use crate::synth::Synthesizer;

/// A transformation from a declaration into its mock.
pub trait Expander: Debug + Send + Sync {
    fn expand(&self, decl: &Declaration) -> Result<MockDeclaration, SynthesisError>;
}

impl Expander for Synthesizer {
    fn expand(&self, decl: &Declaration) -> Result<MockDeclaration, SynthesisError> {
        self.synthesize(decl)
    }
}

/// Expanders keyed by the attribute name that triggers them.
///
/// Tools build a registry up front and pass it to whatever walks their sources; there is no
/// process-wide registration.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    expanders: BTreeMap<String, Arc<dyn Expander>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with a [`Synthesizer`] registered under [`DEFAULT_ATTRIBUTE`].
    pub fn with_defaults(config: SynthesisConfig) -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_ATTRIBUTE, Arc::new(Synthesizer::new(config)));
        registry
    }

    /// Registers `expander` under `name`, returning the expander it replaces, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        expander: Arc<dyn Expander>,
    ) -> Option<Arc<dyn Expander>> {
        self.expanders.insert(name.into(), expander)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Expander>> {
        self.expanders.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.expanders.contains_key(name)
    }

    /// Registered names, in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.expanders.keys().map(String::as_str)
    }

    /// Expands `decl` with the expander registered under `name`.
    ///
    /// Returns `None` if no expander is registered under that name.
    pub fn expand(
        &self,
        name: &str,
        decl: &Declaration,
    ) -> Option<Result<MockDeclaration, SynthesisError>> {
        self.get(name).map(|expander| expander.expand(decl))
    }
}

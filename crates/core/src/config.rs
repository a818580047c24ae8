use crate::constants::{DEFAULT_MOCK_PREFIX, DEFAULT_SLOT_PREFIX};

/// Naming configuration of the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Prepended to the declaration name to form the mock type name.
    pub mock_prefix: String,

    /// Prepended to every slot identifier.
    pub slot_prefix: String,
}

impl SynthesisConfig {
    pub fn with_mock_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mock_prefix = prefix.into();
        self
    }

    pub fn with_slot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.slot_prefix = prefix.into();
        self
    }
}

impl std::default::Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            mock_prefix: DEFAULT_MOCK_PREFIX.to_string(),
            slot_prefix: DEFAULT_SLOT_PREFIX.to_string(),
        }
    }
}

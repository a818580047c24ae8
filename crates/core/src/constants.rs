/// Prefix of every synthesized mock type name, eg. `RtMockA` for `A`.
pub const DEFAULT_MOCK_PREFIX: &str = "RtMock";

/// Prefix of every slot identifier, eg. `mocked_foo_Void`.
pub const DEFAULT_SLOT_PREFIX: &str = "mocked_";

/// Attribute name the default expander is registered under.
pub const DEFAULT_ATTRIBUTE: &str = "rt_mock";

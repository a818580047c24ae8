use rtmock_primitives::{DeclarationKind, SourceLocation};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// The declaration is not an interface-shaped construct.
    #[error("RtMock can only be applied to a protocol, found {kind} `{name}`")]
    NotAProtocolLike { name: String, kind: DeclarationKind, location: SourceLocation },
}

impl SynthesisError {
    /// Returns the location supplied with the rejected declaration.
    pub fn location(&self) -> &SourceLocation {
        match self {
            SynthesisError::NotAProtocolLike { location, .. } => location,
        }
    }
}

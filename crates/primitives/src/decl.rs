use core::fmt;

use crate::location::SourceLocation;
use crate::ty::TypeRef;

/// A single parameter of a method requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Parameter {
    /// The label callers use. When absent, [`Parameter::internal_name`] is both the label and
    /// the binding.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub external_label: Option<String>,
    pub internal_name: String,
    pub ty: TypeRef,
}

impl Parameter {
    pub fn new(internal_name: impl Into<String>, ty: TypeRef) -> Self {
        Self { external_label: None, internal_name: internal_name.into(), ty }
    }

    pub fn labeled(
        label: impl Into<String>,
        internal_name: impl Into<String>,
        ty: TypeRef,
    ) -> Self {
        Self { external_label: Some(label.into()), internal_name: internal_name.into(), ty }
    }

    /// Returns the external label if one was written out, even when it repeats the internal
    /// name.
    pub fn label(&self) -> Option<&str> {
        self.external_label.as_deref()
    }

    /// The name callers see: the external label if any, otherwise the internal name.
    pub fn call_label(&self) -> &str {
        self.external_label.as_deref().unwrap_or(&self.internal_name)
    }
}

/// The signature of a method requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct MemberSignature {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Vec<Parameter>,
    /// `None` is the unit type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub return_type: Option<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_throwing: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_asynchronous: bool,
    /// Type parameter names. Carried through verbatim, never mangled.
    #[cfg_attr(feature = "serde", serde(default))]
    pub generic_parameters: Vec<String>,
}

impl MemberSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            is_throwing: false,
            is_asynchronous: false,
            generic_parameters: Vec::new(),
        }
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn throwing(mut self) -> Self {
        self.is_throwing = true;
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_asynchronous = true;
        self
    }

    pub fn generic_parameter(mut self, name: impl Into<String>) -> Self {
        self.generic_parameters.push(name.into());
        self
    }

    /// Returns the declared return type, or `Void` when there is none.
    pub fn return_type_or_void(&self) -> TypeRef {
        self.return_type.clone().unwrap_or_else(TypeRef::void)
    }
}

/// A member of a trait-like declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Member {
    Method(MemberSignature),
    Property {
        name: String,
        ty: TypeRef,
    },
    /// Anything the synthesizer does not mock (associated types, constants, ..).
    Other {
        #[cfg_attr(feature = "serde", serde(default))]
        name: Option<String>,
    },
}

impl Member {
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Method(sig) => Some(&sig.name),
            Member::Property { name, .. } => Some(name),
            Member::Other { name } => name.as_deref(),
        }
    }
}

/// The source construct a declaration was lowered from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeclarationKind {
    /// An interface listing requirements without implementation, eg. a trait.
    Protocol,
    Struct,
    Enum,
    Union,
    Class,
    Impl,
    Other,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            DeclarationKind::Protocol => "protocol",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Union => "union",
            DeclarationKind::Class => "class",
            DeclarationKind::Impl => "impl block",
            DeclarationKind::Other => "item",
        };
        f.write_str(kind)
    }
}

/// The input of mock synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: SourceLocation,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind) -> Self {
        Self { name: name.into(), kind, members: Vec::new(), location: SourceLocation::default() }
    }

    pub fn protocol(name: impl Into<String>) -> Self {
        Self::new(name, DeclarationKind::Protocol)
    }

    pub fn method(mut self, signature: MemberSignature) -> Self {
        self.members.push(Member::Method(signature));
        self
    }

    pub fn property(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.members.push(Member::Property { name: name.into(), ty });
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn is_protocol_like(&self) -> bool {
        self.kind == DeclarationKind::Protocol
    }
}

use core::fmt;

use crate::decl::MemberSignature;
use crate::ty::TypeRef;

/// The synthesized mock: a type conforming to the source declaration whose members
/// delegate to slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct MockDeclaration {
    pub name: String,
    pub conforms_to: String,
    /// One entry per mocked member, in the order of the source declaration.
    pub items: Vec<MockItem>,
}

impl MockDeclaration {
    /// Iterates over every slot variable of the mock, in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = &SlotVariable> {
        self.items.iter().map(MockItem::slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MockItem {
    Method(MethodMock),
    Property(PropertyMock),
}

impl MockItem {
    pub fn slot(&self) -> &SlotVariable {
        match self {
            MockItem::Method(method) => &method.slot,
            MockItem::Property(property) => &property.slot,
        }
    }

    /// Index of the member in the source declaration this item was derived from.
    pub fn source_index(&self) -> usize {
        match self {
            MockItem::Method(method) => method.source_index,
            MockItem::Property(property) => property.source_index,
        }
    }
}

/// A forwarding method followed by its slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct MethodMock {
    pub source_index: usize,
    pub method: ForwardingMethod,
    pub slot: SlotVariable,
}

/// A method with the declared signature whose body invokes its slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct ForwardingMethod {
    pub signature: MemberSignature,
    pub body: SlotCall,
}

/// A call expression that force-unwraps a slot and invokes it with positional arguments.
///
/// Invoking a forwarding method whose slot was never assigned is a programmer error and
/// must trap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct SlotCall {
    pub slot: String,
    /// Internal parameter names, in declaration order.
    pub arguments: Vec<String>,
    /// The call is awaited.
    pub awaits: bool,
    /// Failures of the call are propagated to the caller.
    pub propagates: bool,
}

/// A read-only accessor followed by its slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct PropertyMock {
    pub source_index: usize,
    pub accessor: ComputedAccessor,
    pub slot: SlotVariable,
}

/// A computed property returning its force-unwrapped slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct ComputedAccessor {
    pub name: String,
    pub ty: TypeRef,
    pub slot: String,
}

/// A mutable, initially unset holder. Its declared type is always the optional of
/// [`SlotVariable::ty`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct SlotVariable {
    pub name: String,
    pub ty: SlotType,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotType {
    Function(FunctionType),
    Value(TypeRef),
}

/// The unlabeled function type mirroring a method signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct FunctionType {
    pub parameters: Vec<TypeRef>,
    pub is_throwing: bool,
    pub is_asynchronous: bool,
    pub return_type: TypeRef,
}

impl FunctionType {
    pub fn of(signature: &MemberSignature) -> Self {
        Self {
            parameters: signature.parameters.iter().map(|param| param.ty.clone()).collect(),
            is_throwing: signature.is_throwing,
            is_asynchronous: signature.is_asynchronous,
            return_type: signature.return_type_or_void(),
        }
    }
}

// (String, Int) async throws -> Void
impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, param) in self.parameters.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")?;

        if self.is_asynchronous {
            f.write_str(" async")?;
        }
        if self.is_throwing {
            f.write_str(" throws")?;
        }

        write!(f, " -> {}", self.return_type)
    }
}

// Renders the declared (optional) type of the slot.
impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotType::Function(function) => write!(f, "({function})?"),
            SlotType::Value(ty) => write!(f, "{}", ty.clone().optional()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::Parameter;

    #[test]
    fn function_type_mirrors_signature() {
        let sig = MemberSignature::new("foo")
            .param(Parameter::labeled("a", "b", TypeRef::named("String")))
            .param(Parameter::new("c", TypeRef::named("Int").optional()))
            .returns(TypeRef::named("Bool"))
            .throwing()
            .asynchronous();

        let function = FunctionType::of(&sig);
        assert_eq!(
            function.parameters,
            vec![TypeRef::named("String"), TypeRef::named("Int").optional()]
        );
        assert_eq!(function.return_type, TypeRef::named("Bool"));
        assert_eq!(function.to_string(), "(String, Int?) async throws -> Bool");
    }

    #[test]
    fn slot_types_are_declared_optional() {
        let function = SlotType::Function(FunctionType::of(&MemberSignature::new("foo")));
        assert_eq!(function.to_string(), "(() -> Void)?");

        let value = SlotType::Value(TypeRef::named("Int"));
        assert_eq!(value.to_string(), "Int?");

        let already_optional = SlotType::Value(TypeRef::named("Int").optional());
        assert_eq!(already_optional.to_string(), "Int??");
    }
}

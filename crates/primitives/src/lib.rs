#![cfg_attr(not(test), warn(unused_crate_dependencies))]

//! Data model for mock synthesis.
//!
//! The [`decl`] module describes the input: a trait-like [`Declaration`](decl::Declaration)
//! handed over by a front end. The [`mock`] module describes the output: the
//! [`MockDeclaration`](mock::MockDeclaration) whose members forward every call to a settable
//! slot.

pub mod decl;
pub mod location;
pub mod mock;
pub mod ty;

pub use decl::{Declaration, DeclarationKind, Member, MemberSignature, Parameter};
pub use location::SourceLocation;
pub use mock::{
    ComputedAccessor, ForwardingMethod, FunctionType, MethodMock, MockDeclaration, MockItem,
    PropertyMock, SlotCall, SlotType, SlotVariable,
};
pub use ty::{TypeKind, TypeRef, VOID_TYPE_NAME};

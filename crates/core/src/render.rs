//! Textual outline of a synthesized mock.
//!
//! The outline is a language-neutral, class-like listing used for inspection and by the CLI:
//!
//! ```text
//! class RtMockA: A {
//!     func foo() throws -> String {
//!         try mocked_foo_String!()
//!     }
//!     var mocked_foo_String: (() throws -> String)?
//! }
//! ```

use core::fmt::{self, Write};

use rtmock_primitives::{
    ComputedAccessor, ForwardingMethod, MemberSignature, MockDeclaration, MockItem, SlotCall,
    SlotVariable,
};

const INDENT: &str = "    ";

/// Renders the outline of `mock`.
pub fn outline(mock: &MockDeclaration) -> String {
    Outline(mock).to_string()
}

/// [`Display`](fmt::Display) adapter rendering a [`MockDeclaration`] as an outline.
#[derive(Debug, Clone, Copy)]
pub struct Outline<'a>(pub &'a MockDeclaration);

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mock = self.0;
        writeln!(f, "class {}: {} {{", mock.name, mock.conforms_to)?;

        for item in &mock.items {
            match item {
                MockItem::Method(method) => {
                    write_method(f, &method.method)?;
                    write_slot(f, &method.slot)?;
                }
                MockItem::Property(property) => {
                    write_accessor(f, &property.accessor)?;
                    write_slot(f, &property.slot)?;
                }
            }
        }

        f.write_str("}")
    }
}

fn write_method(f: &mut fmt::Formatter<'_>, method: &ForwardingMethod) -> fmt::Result {
    writeln!(f, "{INDENT}{} {{", signature(&method.signature))?;
    writeln!(f, "{INDENT}{INDENT}{}", call(&method.body))?;
    writeln!(f, "{INDENT}}}")
}

fn write_accessor(f: &mut fmt::Formatter<'_>, accessor: &ComputedAccessor) -> fmt::Result {
    writeln!(f, "{INDENT}var {}: {} {{", accessor.name, accessor.ty)?;
    writeln!(f, "{INDENT}{INDENT}return {}!", accessor.slot)?;
    writeln!(f, "{INDENT}}}")
}

fn write_slot(f: &mut fmt::Formatter<'_>, slot: &SlotVariable) -> fmt::Result {
    writeln!(f, "{INDENT}var {}: {}", slot.name, slot.ty)
}

/// `func name<T>(label name: Type, ..) async throws -> Return`
fn signature(sig: &MemberSignature) -> String {
    let mut out = format!("func {}", sig.name);

    if !sig.generic_parameters.is_empty() {
        let _ = write!(out, "<{}>", sig.generic_parameters.join(", "));
    }

    out.push('(');
    for (idx, param) in sig.parameters.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        match param.label() {
            Some(label) => {
                let _ = write!(out, "{label} {}: {}", param.internal_name, param.ty);
            }
            None => {
                let _ = write!(out, "{}: {}", param.internal_name, param.ty);
            }
        }
    }
    out.push(')');

    if sig.is_asynchronous {
        out.push_str(" async");
    }
    if sig.is_throwing {
        out.push_str(" throws");
    }
    if let Some(ty) = &sig.return_type {
        let _ = write!(out, " -> {ty}");
    }

    out
}

/// `try await slot!(a, b)`
fn call(call: &SlotCall) -> String {
    let mut out = String::new();
    if call.propagates {
        out.push_str("try ");
    }
    if call.awaits {
        out.push_str("await ");
    }
    let _ = write!(out, "{}!({})", call.slot, call.arguments.join(", "));
    out
}

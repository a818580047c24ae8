//! Slot identifier derivation.
//!
//! A method's slot identifier encodes its name, how each parameter is called together with
//! its type, whether it is asynchronous, and its return type:
//!
//! ```text
//! func foo(a b: String?) async -> [Int]   =>   mocked_foo_aBStringOptional_async_ArrayOf_Int
//! ```
//!
//! The type rendering is a flat projection of the type tree. It does not keep the collection
//! constructor apart from its element type beyond what the spelling carries, so two distinct
//! signatures can in principle render identically. [`SlotNamer`] guards against that within a
//! single declaration by suffixing later duplicates.

use std::collections::HashSet;

use rtmock_primitives::{MemberSignature, Parameter, TypeKind, TypeRef};
use tracing::warn;

/// Renders a type as an identifier fragment.
///
/// - every optional layer becomes an `Optional` suffix
/// - `Name<A, B>` becomes `NameOf_AB_`
/// - `[T]` becomes `ArrayOf_T_`
///
/// A single trailing `_` is then dropped, so `[Int]` is `ArrayOf_Int` while `[[Int]]` is
/// `ArrayOf_ArrayOf_Int_`.
pub fn render_type_name(ty: &TypeRef) -> String {
    let mut name = String::new();
    write_type_name(ty, &mut name);

    let name = name.trim();
    name.strip_suffix('_').unwrap_or(name).trim().to_string()
}

fn write_type_name(ty: &TypeRef, out: &mut String) {
    match &ty.kind {
        TypeKind::Named { name, generic_arguments } => {
            out.push_str(name.replace("->", "").trim());
            if !generic_arguments.is_empty() {
                out.push_str("Of_");
                for arg in generic_arguments {
                    write_type_name(arg, out);
                }
                out.push('_');
            }
        }
        TypeKind::Array(element) => {
            out.push_str("ArrayOf_");
            write_type_name(element, out);
            out.push('_');
        }
    }

    for _ in 0..ty.optional_depth {
        out.push_str("Optional");
    }
}

/// Upper-cases the first character and lower-cases the rest, eg. `userId` -> `Userid`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// The fragment a parameter contributes to its method's slot identifier.
pub fn parameter_fragment(param: &Parameter) -> String {
    let ty = render_type_name(&param.ty);
    match param.label() {
        Some(label) => format!("{label}{}{ty}", capitalize(&param.internal_name)),
        None => format!("{}{ty}", param.call_label()),
    }
}

/// Derives the slot identifier of a method.
///
/// Deterministic and infallible. Uniqueness across a declaration is enforced by
/// [`SlotNamer`].
pub fn slot_name(prefix: &str, signature: &MemberSignature) -> String {
    let mut fragments = Vec::with_capacity(signature.parameters.len() + 3);
    fragments.push(format!("{prefix}{}", signature.name));
    fragments.extend(signature.parameters.iter().map(parameter_fragment));
    if signature.is_asynchronous {
        fragments.push("async".to_string());
    }
    fragments.push(render_type_name(&signature.return_type_or_void()));
    fragments.join("_")
}

/// Hands out slot identifiers for the members of one declaration.
#[derive(Debug, Clone)]
pub struct SlotNamer {
    prefix: String,
    claimed: HashSet<String>,
}

impl SlotNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), claimed: HashSet::new() }
    }

    pub fn method_slot(&mut self, signature: &MemberSignature) -> String {
        let name = slot_name(&self.prefix, signature);
        self.claim(name)
    }

    /// Properties cannot be overloaded, so their slot is the prefixed property name.
    pub fn property_slot(&mut self, property: &str) -> String {
        let name = format!("{}{property}", self.prefix);
        self.claim(name)
    }

    fn claim(&mut self, candidate: String) -> String {
        if self.claimed.insert(candidate.clone()) {
            return candidate;
        }

        let mut suffix = 2usize;
        loop {
            let name = format!("{candidate}_{suffix}");
            if self.claimed.insert(name.clone()) {
                warn!(target: "rtmock::namer", %candidate, %name, "Slot identifier collision.");
                return name;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn named(name: &str) -> TypeRef {
        TypeRef::named(name)
    }

    #[rstest]
    #[case(named("String"), "String")]
    #[case(named("String").optional(), "StringOptional")]
    #[case(named("String").optional().optional(), "StringOptionalOptional")]
    #[case(TypeRef::array(named("Int")), "ArrayOf_Int")]
    #[case(TypeRef::array(named("Int")).optional(), "ArrayOf_Int_Optional")]
    #[case(TypeRef::array(named("Int").optional()), "ArrayOf_IntOptional")]
    #[case(TypeRef::array(TypeRef::array(named("Int"))), "ArrayOf_ArrayOf_Int_")]
    #[case(TypeRef::generic("Int", vec![named("X"), named("Y")]), "IntOf_XY")]
    #[case(TypeRef::generic("Set", vec![named("Int")]).optional(), "SetOf_Int_Optional")]
    #[case(
        TypeRef::generic(
            "Result",
            vec![TypeRef::generic("Vec", vec![named("u8")]), named("Error")]
        ),
        "ResultOf_VecOf_u8_Error"
    )]
    #[case(named(" -> Void "), "Void")]
    fn type_names(#[case] ty: TypeRef, #[case] expected: &str) {
        assert_eq!(render_type_name(&ty), expected);
    }

    #[rstest]
    #[case("b", "B")]
    #[case("userId", "Userid")]
    #[case("URL", "Url")]
    #[case("", "")]
    fn capitalization(#[case] word: &str, #[case] expected: &str) {
        assert_eq!(capitalize(word), expected);
    }

    #[test]
    fn method_without_parameters() {
        let sig = MemberSignature::new("foo");
        assert_eq!(slot_name("mocked_", &sig), "mocked_foo_Void");
    }

    #[test]
    fn labeled_parameter_encodes_label_and_name() {
        let sig = MemberSignature::new("foo").param(Parameter::labeled("a", "b", named("String")));
        assert_eq!(slot_name("mocked_", &sig), "mocked_foo_aBString_Void");
    }

    #[test]
    fn written_out_label_counts_even_when_equal_to_name() {
        let labeled =
            MemberSignature::new("foo").param(Parameter::labeled("a", "a", named("String")));
        let plain = MemberSignature::new("foo").param(Parameter::new("a", named("String")));
        assert_eq!(slot_name("mocked_", &labeled), "mocked_foo_aAString_Void");
        assert_eq!(slot_name("mocked_", &plain), "mocked_foo_aString_Void");
    }

    #[test]
    fn asynchronous_marker_precedes_return_type() {
        let sig = MemberSignature::new("load")
            .param(Parameter::new("id", named("Int")))
            .returns(named("String").optional())
            .asynchronous();
        assert_eq!(slot_name("mocked_", &sig), "mocked_load_idInt_async_StringOptional");
    }

    #[test]
    fn throwing_does_not_change_the_name() {
        let sig = MemberSignature::new("foo");
        assert_eq!(slot_name("mocked_", &sig), slot_name("mocked_", &sig.clone().throwing()));
    }

    #[test]
    fn overloads_get_distinct_names() {
        let string = named("String");
        let overloads = [
            MemberSignature::new("foo").param(Parameter::labeled("a", "b", string.clone())),
            MemberSignature::new("foo")
                .param(Parameter::new("a", string.clone()))
                .param(Parameter::new("b", named("Int"))),
            MemberSignature::new("foo").param(Parameter::new("a", string.clone())),
            MemberSignature::new("foo").param(Parameter::new("a", string.clone().optional())),
            MemberSignature::new("foo").param(Parameter::new("a", named("Int"))),
            MemberSignature::new("foo").param(Parameter::new("with", string)),
            MemberSignature::new("foo").asynchronous(),
            MemberSignature::new("foo").returns(named("String")),
        ];

        let names = overloads.iter().map(|sig| slot_name("mocked_", sig)).collect::<HashSet<_>>();
        assert_eq!(names.len(), overloads.len());
    }

    #[test]
    fn namer_suffixes_collisions() {
        let mut namer = SlotNamer::new("mocked_");
        let sig = MemberSignature::new("foo").param(Parameter::new("a", named("Int")));

        assert_eq!(namer.method_slot(&sig), "mocked_foo_aInt_Void");
        assert_eq!(namer.method_slot(&sig), "mocked_foo_aInt_Void_2");
        assert_eq!(namer.method_slot(&sig), "mocked_foo_aInt_Void_3");
    }

    #[test]
    fn property_slots_share_the_namespace() {
        let mut namer = SlotNamer::new("mocked_");
        assert_eq!(namer.property_slot("foo_Void"), "mocked_foo_Void");
        assert_eq!(namer.method_slot(&MemberSignature::new("foo")), "mocked_foo_Void_2");
    }
}

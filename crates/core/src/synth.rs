use rtmock_primitives::{
    ComputedAccessor, Declaration, ForwardingMethod, FunctionType, Member, MemberSignature,
    MethodMock, MockDeclaration, MockItem, PropertyMock, SlotCall, SlotType, SlotVariable, TypeRef,
};
use tracing::{debug, trace};

use crate::config::SynthesisConfig;
use crate::error::SynthesisError;
use crate::namer::SlotNamer;

/// Builds a mock declaration out of a trait-like declaration.
///
/// The synthesizer holds no state between invocations; the same instance can serve any number
/// of declarations, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesizes the mock of `decl`.
    ///
    /// Methods and properties are mocked in declaration order. Any other member is skipped.
    /// Fails only if `decl` is not protocol-like.
    pub fn synthesize(&self, decl: &Declaration) -> Result<MockDeclaration, SynthesisError> {
        if !decl.is_protocol_like() {
            return Err(SynthesisError::NotAProtocolLike {
                name: decl.name.clone(),
                kind: decl.kind,
                location: decl.location.clone(),
            });
        }

        let mut namer = SlotNamer::new(self.config.slot_prefix.as_str());
        let mut items = Vec::with_capacity(decl.members.len());

        for (index, member) in decl.members.iter().enumerate() {
            match member {
                Member::Method(signature) => {
                    items.push(MockItem::Method(mock_method(index, signature, &mut namer)));
                }
                Member::Property { name, ty } => {
                    items.push(MockItem::Property(mock_property(index, name, ty, &mut namer)));
                }
                Member::Other { name } => {
                    trace!(target: "rtmock::synth", decl = %decl.name, ?name, "Skipping member.");
                }
            }
        }

        let name = format!("{}{}", self.config.mock_prefix, decl.name);
        debug!(target: "rtmock::synth", %name, items = items.len(), "Synthesized mock.");

        Ok(MockDeclaration { name, conforms_to: decl.name.clone(), items })
    }
}

/// Synthesizes the mock of `decl` with the default configuration.
pub fn synthesize(decl: &Declaration) -> Result<MockDeclaration, SynthesisError> {
    Synthesizer::default().synthesize(decl)
}

fn mock_method(index: usize, signature: &MemberSignature, namer: &mut SlotNamer) -> MethodMock {
    let slot = namer.method_slot(signature);

    let body = SlotCall {
        slot: slot.clone(),
        arguments: signature.parameters.iter().map(|param| param.internal_name.clone()).collect(),
        awaits: signature.is_asynchronous,
        propagates: signature.is_throwing,
    };

    MethodMock {
        source_index: index,
        method: ForwardingMethod { signature: signature.clone(), body },
        slot: SlotVariable { name: slot, ty: SlotType::Function(FunctionType::of(signature)) },
    }
}

fn mock_property(index: usize, name: &str, ty: &TypeRef, namer: &mut SlotNamer) -> PropertyMock {
    let slot = namer.property_slot(name);

    PropertyMock {
        source_index: index,
        accessor: ComputedAccessor { name: name.to_string(), ty: ty.clone(), slot: slot.clone() },
        slot: SlotVariable { name: slot, ty: SlotType::Value(ty.clone()) },
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rtmock_primitives::{DeclarationKind, Parameter, SourceLocation};

    use super::*;

    fn string() -> TypeRef {
        TypeRef::named("String")
    }

    fn method(mock: &MockDeclaration, index: usize) -> &MethodMock {
        match &mock.items[index] {
            MockItem::Method(method) => method,
            item => panic!("expected a method at {index}, found {item:?}"),
        }
    }

    #[test]
    fn empty_protocol() {
        let mock = synthesize(&Declaration::protocol("A")).unwrap();
        assert_eq!(mock.name, "RtMockA");
        assert_eq!(mock.conforms_to, "A");
        assert!(mock.items.is_empty());
    }

    #[test]
    fn method_without_arguments() {
        let decl = Declaration::protocol("A").method(MemberSignature::new("foo"));
        let mock = synthesize(&decl).unwrap();

        let foo = method(&mock, 0);
        assert_eq!(foo.slot.name, "mocked_foo_Void");
        assert_eq!(foo.method.body.slot, "mocked_foo_Void");
        assert!(foo.method.body.arguments.is_empty());
        assert!(!foo.method.body.awaits);
        assert!(!foo.method.body.propagates);
        assert_matches!(&foo.slot.ty, SlotType::Function(function) => {
            assert!(function.parameters.is_empty());
            assert!(function.return_type.is_void());
        });
    }

    #[test]
    fn throwing_method_propagates() {
        let decl = Declaration::protocol("A").method(MemberSignature::new("foo").throwing());
        let mock = synthesize(&decl).unwrap();

        let foo = method(&mock, 0);
        assert!(foo.method.body.propagates);
        assert_matches!(&foo.slot.ty, SlotType::Function(function) if function.is_throwing);
    }

    #[test]
    fn asynchronous_method_awaits() {
        let decl = Declaration::protocol("A").method(MemberSignature::new("foo").asynchronous());
        let mock = synthesize(&decl).unwrap();

        let foo = method(&mock, 0);
        assert_eq!(foo.slot.name, "mocked_foo_async_Void");
        assert!(foo.method.body.awaits);
        assert_matches!(&foo.slot.ty, SlotType::Function(function) if function.is_asynchronous);
    }

    #[test]
    fn call_uses_internal_names_in_order() {
        let decl = Declaration::protocol("A").method(
            MemberSignature::new("foo")
                .param(Parameter::labeled("a", "b", string()))
                .param(Parameter::new("c", TypeRef::named("Int"))),
        );
        let mock = synthesize(&decl).unwrap();

        let foo = method(&mock, 0);
        assert_eq!(foo.method.body.arguments, vec!["b".to_string(), "c".to_string()]);
        assert_matches!(&decl.members[0], Member::Method(sig) if *sig == foo.method.signature);
    }

    #[test]
    fn labeled_and_unlabeled_overloads_do_not_collide() {
        let decl = Declaration::protocol("A")
            .method(MemberSignature::new("foo").param(Parameter::labeled("a", "b", string())))
            .method(
                MemberSignature::new("foo")
                    .param(Parameter::new("a", string()))
                    .param(Parameter::new("b", TypeRef::named("Int"))),
            );
        let mock = synthesize(&decl).unwrap();

        assert_eq!(method(&mock, 0).slot.name, "mocked_foo_aBString_Void");
        assert_eq!(method(&mock, 1).slot.name, "mocked_foo_aString_bInt_Void");
    }

    #[test]
    fn optional_overload_differs_by_suffix() {
        let decl = Declaration::protocol("A")
            .method(MemberSignature::new("foo").param(Parameter::new("a", string().optional())))
            .method(MemberSignature::new("foo").param(Parameter::new("a", string())));
        let mock = synthesize(&decl).unwrap();

        assert_eq!(method(&mock, 0).slot.name, "mocked_foo_aStringOptional_Void");
        assert_eq!(method(&mock, 1).slot.name, "mocked_foo_aString_Void");
        assert_ne!(method(&mock, 0).slot.ty, method(&mock, 1).slot.ty);
    }

    #[test]
    fn property() {
        let decl = Declaration::protocol("A").property("someVar", TypeRef::named("Int"));
        let mock = synthesize(&decl).unwrap();

        assert_matches!(&mock.items[0], MockItem::Property(property) => {
            assert_eq!(property.accessor.name, "someVar");
            assert_eq!(property.accessor.slot, "mocked_someVar");
            assert_eq!(property.accessor.ty, TypeRef::named("Int"));
            assert_eq!(property.slot.name, "mocked_someVar");
            assert_eq!(property.slot.ty, SlotType::Value(TypeRef::named("Int")));
        });
    }

    #[test]
    fn other_members_are_skipped_and_order_is_kept() {
        let decl = Declaration::protocol("A")
            .property("first", TypeRef::named("Int"))
            .member(Member::Other { name: Some("Item".into()) })
            .method(MemberSignature::new("second"))
            .member(Member::Other { name: None });
        let mock = synthesize(&decl).unwrap();

        let indices = mock.items.iter().map(MockItem::source_index).collect::<Vec<_>>();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn custom_prefixes() {
        let config = SynthesisConfig::default().with_mock_prefix("Fake").with_slot_prefix("stub_");
        let decl = Declaration::protocol("Store")
            .method(MemberSignature::new("get"))
            .property("count", TypeRef::named("Int"));
        let mock = Synthesizer::new(config).synthesize(&decl).unwrap();

        assert_eq!(mock.name, "FakeStore");
        let slots = mock.slots().map(|slot| slot.name.as_str()).collect::<Vec<_>>();
        assert_eq!(slots, vec!["stub_get_Void", "stub_count"]);
    }

    #[test]
    fn rejects_concrete_types() {
        let location = SourceLocation::new(1, 1).with_file("lib.rs");
        let decl = Declaration::new("A", DeclarationKind::Struct)
            .method(MemberSignature::new("foo"))
            .at(location.clone());

        let err = synthesize(&decl).unwrap_err();
        assert_eq!(err.location(), &location);
        assert_matches!(
            &err,
            SynthesisError::NotAProtocolLike { name, kind: DeclarationKind::Struct, .. }
                if name == "A"
        );
        assert_eq!(err.to_string(), "RtMock can only be applied to a protocol, found struct `A`");
    }

    #[test]
    fn input_is_left_untouched() {
        let decl = Declaration::protocol("A").method(MemberSignature::new("foo").throwing());
        let before = decl.clone();
        let _ = synthesize(&decl).unwrap();
        assert_eq!(decl, before);
    }
}

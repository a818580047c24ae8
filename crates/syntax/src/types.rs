//! Lowering of Rust types into [`TypeRef`]s.

use quote::ToTokens;
use rtmock_primitives::TypeRef;
use syn::visit::{self, Visit};
use syn::visit_mut::VisitMut;
use syn::{GenericArgument, Lifetime, Path, PathArguments, ReturnType, Type, TypeParamBound};

/// Lowers a Rust type.
///
/// References, pointers and parentheses are transparent. `Option<T>` adds an optional layer,
/// slices and arrays become arrays, and every other path keeps its last segment and type
/// arguments.
pub fn lower_type(ty: &Type) -> TypeRef {
    match ty {
        Type::Reference(reference) => lower_type(&reference.elem),
        Type::Ptr(pointer) => lower_type(&pointer.elem),
        Type::Paren(paren) => lower_type(&paren.elem),
        Type::Group(group) => lower_type(&group.elem),
        Type::Slice(slice) => TypeRef::array(lower_type(&slice.elem)),
        Type::Array(array) => TypeRef::array(lower_type(&array.elem)),
        Type::Tuple(tuple) if tuple.elems.is_empty() => TypeRef::void(),
        Type::Tuple(tuple) => {
            TypeRef::generic("Tuple", tuple.elems.iter().map(lower_type).collect())
        }
        Type::Path(path) => lower_path(&path.path),
        Type::BareFn(function) => {
            let mut args =
                function.inputs.iter().map(|arg| lower_type(&arg.ty)).collect::<Vec<_>>();
            args.push(lower_return_type(&function.output));
            TypeRef::generic("Fn", args)
        }
        Type::TraitObject(object) => lower_bounds(&object.bounds, ty),
        Type::ImplTrait(bounds) => lower_bounds(&bounds.bounds, ty),
        Type::Never(_) => TypeRef::named("Never"),
        _ => TypeRef::named(fallback_name(ty)),
    }
}

/// Lowers a return type, mapping `-> ()` and the default return type to `None`.
pub fn lower_output(output: &ReturnType) -> Option<TypeRef> {
    match output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(lower_type(ty)).filter(|ty| !ty.is_void()),
    }
}

fn lower_return_type(output: &ReturnType) -> TypeRef {
    lower_output(output).unwrap_or_else(TypeRef::void)
}

fn lower_path(path: &Path) -> TypeRef {
    let Some(segment) = path.segments.last() else {
        return TypeRef::named(fallback_name(path));
    };

    let mut args = match &segment.arguments {
        PathArguments::None => Vec::new(),
        PathArguments::AngleBracketed(bracketed) => bracketed
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(lower_type(ty)),
                GenericArgument::AssocType(assoc) => Some(lower_type(&assoc.ty)),
                _ => None,
            })
            .collect(),
        PathArguments::Parenthesized(parenthesized) => {
            let mut args = parenthesized.inputs.iter().map(lower_type).collect::<Vec<_>>();
            args.push(lower_return_type(&parenthesized.output));
            args
        }
    };

    if segment.ident == "Option" && args.len() == 1 {
        if let Some(inner) = args.pop() {
            return inner.optional();
        }
    }

    TypeRef::generic(segment.ident.to_string(), args)
}

fn lower_bounds<'a>(bounds: impl IntoIterator<Item = &'a TypeParamBound>, ty: &Type) -> TypeRef {
    bounds
        .into_iter()
        .find_map(|bound| match bound {
            TypeParamBound::Trait(bound) => Some(lower_path(&bound.path)),
            _ => None,
        })
        .unwrap_or_else(|| TypeRef::named(fallback_name(ty)))
}

/// The token text of `tokens` with every non-identifier character removed.
fn fallback_name(tokens: &impl ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Returns `true` if the type is spelled as a `Result`, eg. `Result<T, E>` or `io::Result<T>`.
pub fn is_result(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => {
            path.path.segments.last().is_some_and(|segment| segment.ident == "Result")
        }
        Type::Paren(paren) => is_result(&paren.elem),
        Type::Group(group) => is_result(&group.elem),
        _ => false,
    }
}

/// Returns `true` if `impl Trait` appears anywhere in the type.
pub fn contains_impl_trait(ty: &Type) -> bool {
    #[derive(Default)]
    struct Finder(bool);

    impl<'ast> Visit<'ast> for Finder {
        fn visit_type_impl_trait(&mut self, _: &'ast syn::TypeImplTrait) {
            self.0 = true;
        }

        fn visit_type(&mut self, ty: &'ast Type) {
            if !self.0 {
                visit::visit_type(self, ty);
            }
        }
    }

    let mut finder = Finder::default();
    finder.visit_type(ty);
    finder.0
}

/// Replaces every named lifetime except `'static` with `replacement`.
///
/// Slot closures are higher-ranked over their arguments, so lifetimes bound by the trait
/// method cannot be named in the slot type.
pub fn erase_lifetimes(ty: &Type, replacement: &str) -> Type {
    struct Eraser<'a>(&'a str);

    impl VisitMut for Eraser<'_> {
        fn visit_lifetime_mut(&mut self, lifetime: &mut Lifetime) {
            if lifetime.ident != "static" {
                *lifetime = Lifetime::new(self.0, lifetime.apostrophe);
            }
        }
    }

    let mut ty = ty.clone();
    Eraser(replacement).visit_type_mut(&mut ty);
    ty
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use syn::parse_quote;

    use super::*;

    #[rstest]
    #[case(parse_quote!(String), TypeRef::named("String"))]
    #[case(parse_quote!(&str), TypeRef::named("str"))]
    #[case(parse_quote!(&'a mut Vec<u8>), TypeRef::generic("Vec", vec![TypeRef::named("u8")]))]
    #[case(parse_quote!(Option<String>), TypeRef::named("String").optional())]
    #[case(parse_quote!(Option<Option<i32>>), TypeRef::named("i32").optional().optional())]
    #[case(
        parse_quote!(std::option::Option<[u8]>),
        TypeRef::array(TypeRef::named("u8")).optional()
    )]
    #[case(parse_quote!([u8; 32]), TypeRef::array(TypeRef::named("u8")))]
    #[case(parse_quote!(()), TypeRef::void())]
    #[case(
        parse_quote!((i32, String)),
        TypeRef::generic("Tuple", vec![TypeRef::named("i32"), TypeRef::named("String")])
    )]
    #[case(
        parse_quote!(std::collections::HashMap<String, Vec<u64>>),
        TypeRef::generic(
            "HashMap",
            vec![TypeRef::named("String"), TypeRef::generic("Vec", vec![TypeRef::named("u64")])]
        )
    )]
    #[case(
        parse_quote!(Box<dyn Fn(u8) -> bool + Send>),
        TypeRef::generic(
            "Box",
            vec![TypeRef::generic("Fn", vec![TypeRef::named("u8"), TypeRef::named("bool")])]
        )
    )]
    #[case(
        parse_quote!(fn(u8)),
        TypeRef::generic("Fn", vec![TypeRef::named("u8"), TypeRef::void()])
    )]
    #[case(
        parse_quote!(Cow<'a, str>),
        TypeRef::generic("Cow", vec![TypeRef::named("str")])
    )]
    #[case(parse_quote!(!), TypeRef::named("Never"))]
    #[case(parse_quote!(Self), TypeRef::named("Self"))]
    fn lowering(#[case] ty: Type, #[case] expected: TypeRef) {
        assert_eq!(lower_type(&ty), expected);
    }

    #[test]
    fn unit_output_is_none() {
        assert_eq!(lower_output(&parse_quote!()), None);
        assert_eq!(lower_output(&parse_quote!(-> ())), None);
        assert_eq!(lower_output(&parse_quote!(-> u8)), Some(TypeRef::named("u8")));
    }

    #[rstest]
    #[case(parse_quote!(Result<u8, String>), true)]
    #[case(parse_quote!(std::io::Result<()>), true)]
    #[case(parse_quote!(anyhow::Result<u8>), true)]
    #[case(parse_quote!(Option<Result<u8, ()>>), false)]
    #[case(parse_quote!(u8), false)]
    fn result_detection(#[case] ty: Type, #[case] expected: bool) {
        assert_eq!(is_result(&ty), expected);
    }

    #[rstest]
    #[case(parse_quote!(impl Into<String>), true)]
    #[case(parse_quote!(Box<impl Fn()>), true)]
    #[case(parse_quote!(Box<dyn Fn()>), false)]
    fn impl_trait_detection(#[case] ty: Type, #[case] expected: bool) {
        assert_eq!(contains_impl_trait(&ty), expected);
    }

    #[test]
    fn lifetimes_are_erased_except_static() {
        let ty: Type = parse_quote!(&'a HashMap<&'b str, Cow<'static, str>>);
        let erased = erase_lifetimes(&ty, "'_");
        let expected: Type = parse_quote!(&'_ HashMap<&'_ str, Cow<'static, str>>);
        assert_eq!(erased, expected);
    }
}

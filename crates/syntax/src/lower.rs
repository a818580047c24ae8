//! Lowering of Rust items into [`Declaration`]s.

use std::collections::HashSet;

use proc_macro2::Span;
use quote::ToTokens;
use rtmock_core::constants::DEFAULT_ATTRIBUTE;
use rtmock_primitives::{
    Declaration, DeclarationKind, Member, MemberSignature, Parameter, SourceLocation,
};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Attribute, FnArg, Item, ItemTrait, Pat, PatType, ReturnType, Signature, TraitItem,
    TraitItemFn, Type,
};
use tracing::debug;

use crate::types::{contains_impl_trait, is_result, lower_output, lower_type};

/// Name of the attribute marking mocked traits and of its helper attribute on trait items.
pub const HELPER_ATTRIBUTE: &str = DEFAULT_ATTRIBUTE;

/// Lowers any item. Only traits are lowered member by member; every other item kind yields a
/// declaration without members that the synthesizer rejects.
pub fn lower_item(item: &Item) -> syn::Result<Declaration> {
    let (name, kind) = match item {
        Item::Trait(item) => return lower_trait(item),
        Item::Struct(item) => (item.ident.to_string(), DeclarationKind::Struct),
        Item::Enum(item) => (item.ident.to_string(), DeclarationKind::Enum),
        Item::Union(item) => (item.ident.to_string(), DeclarationKind::Union),
        Item::Impl(item) => (item.self_ty.to_token_stream().to_string(), DeclarationKind::Impl),
        Item::Fn(item) => (item.sig.ident.to_string(), DeclarationKind::Other),
        Item::Type(item) => (item.ident.to_string(), DeclarationKind::Other),
        Item::Mod(item) => (item.ident.to_string(), DeclarationKind::Other),
        _ => (String::new(), DeclarationKind::Other),
    };

    Ok(Declaration::new(name, kind).at(location(name_span(item))))
}

/// The span of the item's name, or of the whole item if it has none.
pub fn name_span(item: &Item) -> Span {
    match item {
        Item::Trait(item) => item.ident.span(),
        Item::Struct(item) => item.ident.span(),
        Item::Enum(item) => item.ident.span(),
        Item::Union(item) => item.ident.span(),
        Item::Impl(item) => item.self_ty.span(),
        Item::Fn(item) => item.sig.ident.span(),
        Item::Type(item) => item.ident.span(),
        Item::Mod(item) => item.ident.span(),
        item => item.span(),
    }
}

/// Lowers a trait into a protocol-like declaration, one member per trait item.
pub fn lower_trait(item: &ItemTrait) -> syn::Result<Declaration> {
    let mut decl =
        Declaration::protocol(item.ident.unraw().to_string()).at(location(item.ident.span()));
    for trait_item in &item.items {
        decl.members.push(lower_trait_item(trait_item)?);
    }
    Ok(decl)
}

fn lower_trait_item(item: &TraitItem) -> syn::Result<Member> {
    match item {
        TraitItem::Fn(method) => {
            if is_property(&method.attrs)? {
                lower_property(method)
            } else {
                Ok(lower_method(method))
            }
        }
        TraitItem::Const(item) => Ok(skipped(Some(&item.ident), "associated constant")),
        TraitItem::Type(item) => Ok(skipped(Some(&item.ident), "associated type")),
        _ => Ok(skipped(None, "unsupported trait item")),
    }
}

fn lower_method(method: &TraitItemFn) -> Member {
    let sig = &method.sig;

    if sig.receiver().is_none() {
        return skipped(Some(&sig.ident), "method without a `self` receiver");
    }
    if sig.generics.type_params().next().is_some() || sig.generics.const_params().next().is_some()
    {
        return skipped(Some(&sig.ident), "method with type or const parameters");
    }

    let inputs = typed_inputs(sig).collect::<Vec<_>>();
    let impl_output = matches!(&sig.output, ReturnType::Type(_, ty) if contains_impl_trait(ty));
    if impl_output || inputs.iter().any(|arg| contains_impl_trait(&arg.ty)) {
        return skipped(Some(&sig.ident), "method with `impl Trait` in its signature");
    }

    let parameters = binding_names(&inputs)
        .into_iter()
        .zip(&inputs)
        .map(|(name, arg)| Parameter::new(name, lower_type(&arg.ty)))
        .collect();

    Member::Method(MemberSignature {
        name: sig.ident.unraw().to_string(),
        parameters,
        return_type: lower_output(&sig.output),
        is_throwing: matches!(&sig.output, ReturnType::Type(_, ty) if is_result(ty)),
        is_asynchronous: sig.asyncness.is_some(),
        generic_parameters: sig.generics.lifetimes().map(|def| def.lifetime.to_string()).collect(),
    })
}

fn lower_property(method: &TraitItemFn) -> syn::Result<Member> {
    let sig = &method.sig;

    let is_getter = sig.receiver().is_some_and(|receiver| {
        receiver.reference.is_some()
            && receiver.mutability.is_none()
            && receiver.colon_token.is_none()
    }) && sig.inputs.len() == 1
        && sig.asyncness.is_none()
        && sig.generics.params.is_empty();

    match &sig.output {
        ReturnType::Type(_, ty) if is_getter && !is_unit(ty) => {
            Ok(Member::Property { name: sig.ident.unraw().to_string(), ty: lower_type(ty) })
        }
        _ => Err(syn::Error::new_spanned(
            sig,
            "`#[rt_mock(property)]` requires a `fn name(&self) -> T` signature",
        )),
    }
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

/// Parses the `#[rt_mock(..)]` helper attributes of a trait method.
fn is_property(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut property = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(HELPER_ATTRIBUTE)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("property") {
                property = true;
                Ok(())
            } else {
                Err(meta.error("unsupported `rt_mock` option, expected `property`"))
            }
        })?;
    }
    Ok(property)
}

fn skipped(ident: Option<&syn::Ident>, reason: &str) -> Member {
    let name = ident.map(|ident| ident.unraw().to_string());
    debug!(target: "rtmock::syntax", ?name, reason, "Skipping trait item.");
    Member::Other { name }
}

/// The typed (non-receiver) inputs of a signature.
pub(crate) fn typed_inputs(sig: &Signature) -> impl Iterator<Item = &PatType> {
    sig.inputs.iter().filter_map(|input| match input {
        FnArg::Typed(arg) => Some(arg),
        FnArg::Receiver(_) => None,
    })
}

/// The names the parameters are bound to in the forwarding method.
///
/// Patterns other than plain identifiers are replaced by `arg<index>`, suffixed with `_<n>`
/// when a parameter of the method already uses that name.
pub fn binding_names(inputs: &[&PatType]) -> Vec<String> {
    let mut taken = inputs.iter().filter_map(|arg| plain_binding(&arg.pat)).collect::<HashSet<_>>();

    inputs
        .iter()
        .enumerate()
        .map(|(index, arg)| {
            plain_binding(&arg.pat).unwrap_or_else(|| {
                let mut name = format!("arg{index}");
                let mut suffix = 0;
                while taken.contains(&name) {
                    suffix += 1;
                    name = format!("arg{index}_{suffix}");
                }
                taken.insert(name.clone());
                name
            })
        })
        .collect()
}

fn plain_binding(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) if ident.subpat.is_none() => Some(ident.ident.unraw().to_string()),
        _ => None,
    }
}

/// Removes the `#[rt_mock(..)]` helper attributes from the items of a trait.
pub fn strip_helper_attributes(item: &mut ItemTrait) {
    let is_helper = |attr: &Attribute| attr.path().is_ident(HELPER_ATTRIBUTE);
    for trait_item in &mut item.items {
        match trait_item {
            TraitItem::Fn(item) => item.attrs.retain(|attr| !is_helper(attr)),
            TraitItem::Const(item) => item.attrs.retain(|attr| !is_helper(attr)),
            TraitItem::Type(item) => item.attrs.retain(|attr| !is_helper(attr)),
            TraitItem::Macro(item) => item.attrs.retain(|attr| !is_helper(attr)),
            _ => {}
        }
    }
}

fn location(span: Span) -> SourceLocation {
    let start = span.start();
    if start.line == 0 {
        SourceLocation::default()
    } else {
        SourceLocation::new(start.line, start.column + 1)
    }
}

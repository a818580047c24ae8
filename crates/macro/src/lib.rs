#![cfg_attr(not(test), warn(unused_crate_dependencies))]

//! Procedural macro for generating slot-backed mocks of traits.

mod rt_mock;

/// Generates a mock implementation of the annotated trait.
///
/// For a trait `Greeter` the macro emits, next to the trait itself, a struct `RtMockGreeter`
/// with one public `Option` slot per method. Each slot holds a boxed closure the
/// implementation forwards to; calling a method whose slot is unset panics. Slots are named
/// after the full method signature, eg. `mocked_greet_namestr_String` below.
///
/// # Usage
///
/// ```ignore
/// use rtmock_macro::rt_mock;
///
/// #[rt_mock]
/// trait Greeter {
///     fn greet(&self, name: &str) -> String;
///
///     #[rt_mock(property)]
///     fn language(&self) -> &str;
/// }
///
/// let mut greeter = RtMockGreeter::new();
/// greeter.mocked_greet_namestr_String = Some(Box::new(|name: &str| format!("Hi, {name}")));
/// greeter.mocked_language = Some("en".to_string());
///
/// assert_eq!(greeter.greet("Bob"), "Hi, Bob");
/// assert_eq!(greeter.language(), "en");
/// ```
///
/// This will generate:
/// - The trait, with the `#[rt_mock(property)]` helper attributes removed
/// - A struct `RtMock<Trait>` with the trait's visibility and generics
/// - `new()`, `Default` and `Debug` for the struct
/// - The trait implementation forwarding every method to its slot
///
/// Methods returning a `Result` propagate the slot's error, `async` methods await the boxed
/// future returned by the slot, and `#[async_trait]` on the trait is carried over to the
/// implementation (place `#[rt_mock]` above it). Methods the mock cannot forward, such as
/// those without a `self` receiver or with type parameters, are left to their default body.
#[proc_macro_attribute]
pub fn rt_mock(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    rt_mock::rt_mock_impl(attr.into(), item.into()).into()
}

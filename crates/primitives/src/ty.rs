use core::fmt;

/// Name given to the unit type when a member has no return type.
pub const VOID_TYPE_NAME: &str = "Void";

/// A type expression as seen by the synthesizer.
///
/// Optionality is kept as a layer count on top of [`TypeKind`] so that `T??` stays
/// distinguishable from `T?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct TypeRef {
    pub kind: TypeKind,
    /// Number of optional layers wrapped around [`TypeRef::kind`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional_depth: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TypeKind {
    /// A nominal type, possibly applied to generic arguments, eg. `Dictionary<String, Int>`.
    Named {
        name: String,
        #[cfg_attr(feature = "serde", serde(default))]
        generic_arguments: Vec<TypeRef>,
    },
    /// A collection wrapping a single element type, eg. `[Int]`.
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::generic(name, Vec::new())
    }

    pub fn generic(name: impl Into<String>, generic_arguments: Vec<TypeRef>) -> Self {
        Self { kind: TypeKind::Named { name: name.into(), generic_arguments }, optional_depth: 0 }
    }

    pub fn array(element: TypeRef) -> Self {
        Self { kind: TypeKind::Array(Box::new(element)), optional_depth: 0 }
    }

    /// The unit type, used whenever a return type is absent.
    pub fn void() -> Self {
        Self::named(VOID_TYPE_NAME)
    }

    /// Wraps the type in one more optional layer.
    pub fn optional(mut self) -> Self {
        self.optional_depth = self.optional_depth.saturating_add(1);
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional_depth > 0
    }

    /// Returns the type with every optional layer removed.
    pub fn unwrapped(&self) -> TypeRef {
        Self { kind: self.kind.clone(), optional_depth: 0 }
    }

    pub fn is_void(&self) -> bool {
        self.optional_depth == 0
            && matches!(
                &self.kind,
                TypeKind::Named { name, generic_arguments }
                    if name == VOID_TYPE_NAME && generic_arguments.is_empty()
            )
    }
}

// Renders the type in the declaration-level spelling, eg. `[String?]?` or `Result<Int, Error>`.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Named { name, generic_arguments } => {
                f.write_str(name)?;
                if !generic_arguments.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in generic_arguments.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
            }
            TypeKind::Array(element) => write!(f, "[{element}]")?,
        }

        for _ in 0..self.optional_depth {
            f.write_str("?")?;
        }

        Ok(())
    }
}

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, ValueEnum};
use rtmock_core::constants::{DEFAULT_MOCK_PREFIX, DEFAULT_SLOT_PREFIX};
use rtmock_core::{render, Expander, Registry, SynthesisConfig, Synthesizer};
use rtmock_primitives::SourceLocation;
use syn::Item;
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Rust source file to scan for annotated traits
    #[arg(value_name = "FILE")]
    pub(super) file: PathBuf,

    /// What to print for every expanded trait
    #[arg(long, value_enum, default_value_t = Emit::Rust)]
    pub(super) emit: Emit,

    /// Additional attribute name that marks a trait for expansion. `rt_mock` is always
    /// recognized.
    #[arg(long = "attribute", value_name = "NAME")]
    pub(super) attributes: Vec<String>,

    /// Prefix of the generated mock type names
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_MOCK_PREFIX)]
    #[arg(value_parser = identifier_prefix)]
    pub(super) mock_prefix: String,

    /// Prefix of the generated slot identifiers
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_SLOT_PREFIX)]
    #[arg(value_parser = identifier_prefix)]
    pub(super) slot_prefix: String,
}

/// Accepts prefixes that keep the generated names valid identifiers.
fn identifier_prefix(prefix: &str) -> Result<String, String> {
    let candidate = format!("{prefix}x");
    let is_word = candidate.chars().all(|c| c == '_' || c.is_alphanumeric());

    match syn::parse_str::<syn::Ident>(&candidate) {
        Ok(_) if is_word => Ok(prefix.to_string()),
        _ => Err(format!("`{prefix}` cannot start an identifier")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The mock as Rust items
    Rust,
    /// A language-neutral outline of the mock
    Outline,
    /// The synthesized mock declaration as JSON
    Json,
}

impl ExpandArgs {
    pub fn execute(self) -> Result<()> {
        let source = fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let expansion = self.expand_source(&source)?;

        for output in &expansion.outputs {
            println!("{output}");
        }
        for diagnostic in &expansion.diagnostics {
            eprintln!("{diagnostic}");
        }

        info!(
            target: "rtmock::cli",
            file = %self.file.display(),
            mocks = expansion.outputs.len(),
            errors = expansion.diagnostics.len(),
            "Expanded source file."
        );

        if !expansion.diagnostics.is_empty() {
            bail!("{} item(s) could not be expanded", expansion.diagnostics.len());
        }

        Ok(())
    }

    fn registry(&self) -> Registry {
        let config = SynthesisConfig::default()
            .with_mock_prefix(&self.mock_prefix)
            .with_slot_prefix(&self.slot_prefix);

        let synthesizer: Arc<dyn Expander> = Arc::new(Synthesizer::new(config.clone()));
        let mut registry = Registry::with_defaults(config);
        for name in &self.attributes {
            registry.register(name.clone(), synthesizer.clone());
        }
        registry
    }

    /// Expands every annotated item of `source`, in source order.
    fn expand_source(&self, source: &str) -> Result<Expansion> {
        let file = syn::parse_file(source)
            .map_err(|err| anyhow!("{}", Diagnostic::from_syn(&self.file, &err)))?;
        let registry = self.registry();

        let mut annotated = Vec::new();
        collect_annotated(&file.items, &registry, &mut annotated);

        let mut expansion = Expansion::default();
        for (name, item) in annotated {
            let Some(expander) = registry.get(name) else { continue };
            debug!(target: "rtmock::cli", attribute = name, "Expanding item.");

            match self.expand_item(item, expander.as_ref()) {
                Ok(output) => expansion.outputs.push(output),
                Err(diagnostic) => expansion.diagnostics.push(diagnostic),
            }
        }

        Ok(expansion)
    }

    fn expand_item(&self, item: &Item, expander: &dyn Expander) -> Result<String, Diagnostic> {
        let from_syn = |err: syn::Error| Diagnostic::from_syn(&self.file, &err);

        if self.emit == Emit::Rust {
            let tokens = rtmock_syntax::expand_mock(item, expander).map_err(from_syn)?;
            return Ok(tokens.to_string());
        }

        let decl = rtmock_syntax::lower::lower_item(item).map_err(from_syn)?;
        let mock = expander.expand(&decl).map_err(|err| Diagnostic {
            location: self.located(err.location().clone()),
            message: err.to_string(),
        })?;

        match self.emit {
            Emit::Json => serde_json::to_string_pretty(&mock).map_err(|err| Diagnostic {
                location: self.located(decl.location.clone()),
                message: err.to_string(),
            }),
            _ => Ok(render::outline(&mock)),
        }
    }

    fn located(&self, location: SourceLocation) -> SourceLocation {
        location.with_file(self.file.display().to_string())
    }
}

/// Collects the items carrying one of the registry's attributes, descending into inline
/// modules. Attributes are matched on the last segment of their path.
fn collect_annotated<'a>(
    items: &'a [Item],
    registry: &'a Registry,
    out: &mut Vec<(&'a str, &'a Item)>,
) {
    for item in items {
        if let Item::Mod(module) = item {
            if let Some((_, items)) = &module.content {
                collect_annotated(items, registry, out);
            }
        }

        let attrs = item_attributes(item);
        let name = attrs.iter().find_map(|attr| {
            let segment = attr.path().segments.last()?;
            registry.names().find(|name| segment.ident == name)
        });
        if let Some(name) = name {
            out.push((name, item));
        }
    }
}

fn item_attributes(item: &Item) -> &[syn::Attribute] {
    match item {
        Item::Trait(item) => &item.attrs,
        Item::Struct(item) => &item.attrs,
        Item::Enum(item) => &item.attrs,
        Item::Union(item) => &item.attrs,
        Item::Impl(item) => &item.attrs,
        Item::Fn(item) => &item.attrs,
        Item::Type(item) => &item.attrs,
        Item::Mod(item) => &item.attrs,
        _ => &[],
    }
}

#[derive(Debug, Default)]
struct Expansion {
    /// One rendered mock per successfully expanded item.
    outputs: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

/// An error attributed to a position in the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Diagnostic {
    location: SourceLocation,
    message: String,
}

impl Diagnostic {
    fn from_syn(file: &Path, err: &syn::Error) -> Self {
        let start = err.span().start();
        let location = SourceLocation::new(start.line, start.column + 1)
            .with_file(file.display().to_string());
        Self { location, message: err.to_string() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: error: {}", self.location, self.message)
    }
}

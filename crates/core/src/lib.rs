#![cfg_attr(not(test), warn(unused_crate_dependencies))]

//! Mock synthesis for trait-like declarations.
//!
//! [`namer`] turns a method signature into a collision-free slot identifier and
//! [`synth`] assembles the mock declaration around those slots. Front ends hand in a
//! [`Declaration`](rtmock_primitives::Declaration) and get back a
//! [`MockDeclaration`](rtmock_primitives::MockDeclaration), optionally through a
//! [`Registry`] of named expanders.

pub mod config;
pub mod constants;
pub mod error;
pub mod namer;
pub mod registry;
pub mod render;
pub mod synth;

pub use config::SynthesisConfig;
pub use error::SynthesisError;
pub use registry::{Expander, Registry};
pub use synth::{synthesize, Synthesizer};

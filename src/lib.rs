#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod binding;
pub(crate) mod callable;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod scanner;
pub(crate) mod signature;

pub mod tokenizer;
pub mod utils;

pub use any::{TypeInfo, Value};
pub use binding::Binding;
pub use callable::{Arguments, Class, Function};
pub use config::Config;
pub use errors::{ExtendErrorKind, InstantiateErrorKind, InstantiateResult, ResolveErrorKind};
pub use registry::Registry;
pub use scanner::strip_comments;
pub use signature::{Parameter, Signature};
pub use tokenizer::tokenize;

use alloc::string::String;
use core::fmt::{self, Display, Formatter};

use super::instantiate::InstantiateErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("{key} is not registered in registry. Current registry: \"{registry}\"{}", InheritingFrom(.ancestors))]
    Unregistered {
        key: String,
        registry: String,
        /// Rendered parent chain of the registry, empty if it has no parents
        ancestors: String,
    },
    #[error("Invalid type for invoke: got type \"{type_name}\" requires type \"Function\"")]
    NotCallable { type_name: &'static str },
    #[error("Incorrect type of \"{key}\". Actual: {}, expected: {}", actual.name, expected.name)]
    IncorrectType {
        key: String,
        expected: TypeInfo,
        actual: TypeInfo,
    },
    #[error(transparent)]
    Instantiate(#[from] InstantiateErrorKind),
}

struct InheritingFrom<'a>(&'a str);

impl Display for InheritingFrom<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " - inheriting from: {}", self.0)
    }
}

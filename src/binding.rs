use crate::{
    any::Value,
    callable::{Class, Function},
    config::Config,
};

/// How a registry produces the value of a key
#[derive(Debug, Clone)]
pub enum Binding {
    /// Already computed value
    Constant(Value),
    /// Instance built once, when it was registered
    Singleton(Value),
    /// Class constructed with injection on every lookup
    Transient(Class),
    /// Function invoked with injection on the first lookup.
    /// Its result replaces the binding as [`Binding::Constant`] if [`Config::cache_provides`] is set.
    Provider(Function, Config),
}

impl Binding {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::Singleton(_) => "singleton",
            Self::Transient(_) => "transient",
            Self::Provider(..) => "provider",
        }
    }
}

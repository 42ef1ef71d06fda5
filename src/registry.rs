use alloc::{collections::BTreeMap, string::String, vec::Vec};
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::{
    any::Value,
    binding::Binding,
    callable::{Class, Function},
    config::Config,
    errors::{ExtendErrorKind, ResolveErrorKind},
    utils::thread_safety::{RcThreadSafety, ReentrantLockThreadSafety, SendSafety, SyncSafety},
};

/// Named collection of bindings with an ordered list of parent registries.
///
/// Cloning a registry is cheap, clones share the bindings and the parents.
#[derive(Clone)]
pub struct Registry {
    pub(crate) inner: RcThreadSafety<RegistryInner>,
}

pub(crate) struct RegistryInner {
    pub(crate) name: String,
    pub(crate) bindings: RwLock<BTreeMap<String, Binding>>,
    pub(crate) parents: RwLock<Vec<Registry>>,
    /// Serializes provider calls, so a memoized provider is called once
    pub(crate) provider_lock: ReentrantLockThreadSafety,
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: RcThreadSafety::new(RegistryInner {
                name: name.into(),
                bindings: RwLock::new(BTreeMap::new()),
                parents: RwLock::new(Vec::new()),
                provider_lock: ReentrantLockThreadSafety::new(),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Binds the key, replacing the previous binding of any kind.
    /// Returns the replaced binding.
    pub fn set(&self, key: impl Into<String>, binding: Binding) -> Option<Binding> {
        let key = key.into();
        debug!(registry = self.name(), key = key.as_str(), kind = binding.kind(), "Bound");
        self.inner.bindings.write().insert(key, binding)
    }

    /// Checks local bindings only, parents aren't consulted
    #[inline]
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.inner.bindings.read().contains_key(key)
    }

    #[inline]
    pub fn remove(&self, key: &str) -> Option<Binding> {
        self.inner.bindings.write().remove(key)
    }

    #[inline]
    pub fn constant<T: SendSafety + SyncSafety + 'static>(&self, key: impl Into<String>, value: T) -> &Self {
        self.set(key, Binding::Constant(Value::new(value)));
        self
    }

    /// Instantiates the class now, with injection, and binds the instance.
    ///
    /// # Errors
    /// Returns the error of the instantiation, the key is left untouched
    pub fn singleton(&self, key: impl Into<String>, class: &Class) -> Result<&Self, ResolveErrorKind> {
        let instance = self.instantiate(class)?;
        self.set(key, Binding::Singleton(instance));
        Ok(self)
    }

    #[inline]
    pub fn transient(&self, key: impl Into<String>, class: Class) -> &Self {
        self.set(key, Binding::Transient(class));
        self
    }

    #[inline]
    pub fn provider(&self, key: impl Into<String>, function: Function) -> &Self {
        self.provider_with_config(key, function, Config::default())
    }

    #[inline]
    pub fn provider_with_config(&self, key: impl Into<String>, function: Function, config: Config) -> &Self {
        self.set(key, Binding::Provider(function, config));
        self
    }

    /// Invokes the function now, with injection, and binds its result as a constant.
    ///
    /// # Errors
    /// Returns the error of the invocation, the key is left untouched
    pub fn register(&self, key: impl Into<String>, function: &Function) -> Result<&Self, ResolveErrorKind> {
        let value = self.invoke(None, function)?;
        self.set(key, Binding::Constant(value));
        Ok(self)
    }

    /// Adds a parent registry.
    /// Parents are consulted in reverse order of their extension, the last extended first.
    ///
    /// # Errors
    /// Returns [`ExtendErrorKind::CyclicDelegation`] if the parent is this registry or is already delegating to it
    pub fn extend(&self, parent: &Registry) -> Result<&Self, ExtendErrorKind> {
        if self.ptr_eq(parent) || parent.delegates_to(self) {
            let err = ExtendErrorKind::CyclicDelegation {
                registry: self.inner.name.clone(),
                parent: parent.inner.name.clone(),
            };
            error!("{}", err);
            return Err(err);
        }

        self.inner.parents.write().push(parent.clone());
        debug!(registry = self.name(), parent = parent.name(), "Extended");
        Ok(self)
    }

    /// Parents in extension order
    #[inline]
    #[must_use]
    pub fn parents(&self) -> Vec<Registry> {
        self.inner.parents.read().clone()
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        RcThreadSafety::ptr_eq(&self.inner, &other.inner)
    }
}

impl Registry {
    #[inline]
    pub(crate) fn binding(&self, key: &str) -> Option<Binding> {
        self.inner.bindings.read().get(key).cloned()
    }

    /// Replaces the provider binding of the key with its result.
    /// Does nothing if the key was rebound after the provider was taken.
    pub(crate) fn memoize(&self, key: &str, provider: &Function, value: Value) {
        let mut bindings = self.inner.bindings.write();
        if let Some(binding) = bindings.get_mut(key) {
            if matches!(&*binding, Binding::Provider(current, _) if current.ptr_eq(provider)) {
                *binding = Binding::Constant(value);
                debug!("Memoized");
            }
        }
    }

    fn delegates_to(&self, other: &Registry) -> bool {
        self.inner
            .parents
            .read()
            .iter()
            .any(|parent| parent.ptr_eq(other) || parent.delegates_to(other))
    }

    /// Renders the parent chain as `["b" <- ["a"], "c"]`, empty if there are no parents
    pub(crate) fn render_ancestors(&self) -> String {
        let parents = self.inner.parents.read();
        if parents.is_empty() {
            return String::new();
        }

        let rendered: Vec<String> = parents
            .iter()
            .map(|parent| {
                let ancestors = parent.render_ancestors();
                if ancestors.is_empty() {
                    alloc::format!("\"{}\"", parent.name())
                } else {
                    alloc::format!("\"{}\" <- {ancestors}", parent.name())
                }
            })
            .collect();
        alloc::format!("[{}]", rendered.join(", "))
    }
}

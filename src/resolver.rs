use alloc::{borrow::ToOwned as _, vec::Vec};
use tracing::{debug, error, info_span};

use crate::{
    any::{TypeInfo, Value},
    binding::Binding,
    callable::{Arguments, Class, Function},
    config::Config,
    errors::ResolveErrorKind,
    signature::Signature,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    Registry,
};

impl Registry {
    /// Gets the value of the key.
    ///
    /// Local bindings are checked first, then the parents, from the last extended one,
    /// each with its own parents before the next one.
    /// A parent failing to resolve the key is skipped.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::Unregistered`] if neither this registry nor any of its parents binds the key
    /// - Returns the error of a local transient or provider binding
    pub fn get(&self, key: &str) -> Result<Value, ResolveErrorKind> {
        self.resolve(key).inspect_err(|err| error!("{}", err))
    }

    /// Gets the value of the key as `T`
    ///
    /// # Errors
    /// - Returns the errors of [`Self::get`]
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the value holds another type
    pub fn get_as<T: SendSafety + SyncSafety + 'static>(&self, key: &str) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
        let value = self.get(key)?;
        value.downcast().ok_or_else(|| {
            let err = ResolveErrorKind::IncorrectType {
                key: key.to_owned(),
                expected: TypeInfo::of::<T>(),
                actual: value.type_info(),
            };
            error!("{}", err);
            err
        })
    }

    /// Calls the function with its parameters resolved from the registry, in declared order.
    /// The receiver is passed to the function as [`Arguments::this`].
    ///
    /// # Errors
    /// - Returns the error of a parameter resolution
    /// - Returns [`ResolveErrorKind::Instantiate`] if the function fails
    pub fn invoke(&self, this: Option<&Value>, function: &Function) -> Result<Value, ResolveErrorKind> {
        self.call(this, function).inspect_err(|err| error!("{}", err))
    }

    /// Same as [`Self::invoke`] for a value that is expected to hold a [`Function`]
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotCallable`] if the value doesn't hold a function
    /// - Returns the errors of [`Self::invoke`]
    pub fn invoke_value(&self, this: Option<&Value>, target: &Value) -> Result<Value, ResolveErrorKind> {
        let Some(function) = target.downcast_ref::<Function>() else {
            let err = ResolveErrorKind::NotCallable {
                type_name: target.type_info().name,
            };
            error!("{}", err);
            return Err(err);
        };
        self.invoke(this, function)
    }

    /// Constructs a new instance of the class with its constructor parameters resolved from the registry.
    /// Instances are never cached, bind the class as a singleton to reuse one.
    ///
    /// # Errors
    /// - Returns the error of a parameter resolution
    /// - Returns [`ResolveErrorKind::Instantiate`] if the constructor fails
    pub fn instantiate(&self, class: &Class) -> Result<Value, ResolveErrorKind> {
        self.construct(class).inspect_err(|err| error!("{}", err))
    }
}

// Nested resolution failures are logged at debug level, public entry points log the error they return
impl Registry {
    fn resolve(&self, key: &str) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("get", key, registry = self.name());
        let _guard = span.enter();

        if let Some(value) = self.lookup(key) {
            return value;
        }

        let err = ResolveErrorKind::Unregistered {
            key: key.to_owned(),
            registry: self.name().to_owned(),
            ancestors: self.render_ancestors(),
        };
        debug!("{}", err);
        Err(err)
    }

    fn call(&self, this: Option<&Value>, function: &Function) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("invoke", registry = self.name());
        let _guard = span.enter();

        let arguments = self.resolve_arguments(this.cloned(), function.signature())?;
        match function.call(arguments) {
            Ok(value) => {
                debug!("Invoked");
                Ok(value)
            }
            Err(err) => {
                debug!("{}", err);
                Err(ResolveErrorKind::Instantiate(err))
            }
        }
    }

    fn construct(&self, class: &Class) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("instantiate", class = class.type_info().short_name(), registry = self.name());
        let _guard = span.enter();

        let arguments = self.resolve_arguments(None, class.signature())?;
        match class.construct(arguments) {
            Ok(instance) => {
                debug!("Instantiated");
                Ok(instance)
            }
            Err(err) => {
                debug!("{}", err);
                Err(ResolveErrorKind::Instantiate(err))
            }
        }
    }

    /// `None` if the key is bound neither locally nor in any parent
    fn lookup(&self, key: &str) -> Option<Result<Value, ResolveErrorKind>> {
        if let Some(binding) = self.binding(key) {
            return Some(self.resolve_binding(key, binding));
        }

        for parent in self.parents().iter().rev() {
            match parent.lookup(key) {
                Some(Ok(value)) => {
                    debug!(parent = parent.name(), "Found in parent");
                    return Some(Ok(value));
                }
                Some(Err(err)) => {
                    debug!(parent = parent.name(), %err, "Parent failed, skipped");
                }
                None => {}
            }
        }

        None
    }

    fn resolve_binding(&self, key: &str, binding: Binding) -> Result<Value, ResolveErrorKind> {
        match binding {
            Binding::Constant(value) | Binding::Singleton(value) => {
                debug!("Found");
                Ok(value)
            }
            Binding::Transient(class) => self.construct(&class),
            Binding::Provider(function, config) => self.resolve_provider(key, &function, config),
        }
    }

    fn resolve_provider(&self, key: &str, function: &Function, config: Config) -> Result<Value, ResolveErrorKind> {
        if !config.cache_provides {
            return self.call(None, function);
        }

        let _guard = self.inner.provider_lock.lock();
        // Another caller may have memoized or rebound the key while the lock was awaited
        match self.binding(key) {
            Some(Binding::Provider(current, _)) if current.ptr_eq(function) => {}
            Some(binding) => return self.resolve_binding(key, binding),
            None => return self.call(None, function),
        }

        let value = self.call(None, function)?;
        self.memoize(key, function, value.clone());
        Ok(value)
    }

    fn resolve_arguments(&self, this: Option<Value>, signature: &Signature) -> Result<Arguments, ResolveErrorKind> {
        let values = signature
            .iter()
            .map(|parameter| self.resolve(parameter.injection_key()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Arguments::new(this, values))
    }
}

use alloc::{borrow::Cow, boxed::Box, vec::Vec};
use core::{
    fmt::{self, Debug, Formatter},
    slice,
};

use crate::{
    any::{TypeInfo, Value},
    errors::{InstantiateErrorKind, InstantiateResult},
    signature::Signature,
    utils::thread_safety::{BoxFnThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Resolved positional arguments of a call, with the optional receiver
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    this: Option<Value>,
    values: Vec<Value>,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub fn new(this: Option<Value>, values: Vec<Value>) -> Self {
        Self { this, values }
    }

    #[inline]
    #[must_use]
    pub fn this(&self) -> Option<&Value> {
        self.this.as_ref()
    }

    /// Gets the receiver the function was invoked with
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingThis`] if the function was invoked without a receiver
    /// - Returns [`InstantiateErrorKind::IncorrectThisType`] if the receiver holds another type
    pub fn this_as<T: SendSafety + SyncSafety + 'static>(&self) -> InstantiateResult<RcThreadSafety<T>> {
        let this = self.this.as_ref().ok_or(InstantiateErrorKind::MissingThis)?;
        this.downcast().ok_or_else(|| InstantiateErrorKind::IncorrectThisType {
            expected: TypeInfo::of::<T>(),
            actual: this.type_info(),
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::MissingArgument`] if fewer arguments were passed
    pub fn value(&self, index: usize) -> InstantiateResult<&Value> {
        self.values.get(index).ok_or(InstantiateErrorKind::MissingArgument {
            index,
            len: self.values.len(),
        })
    }

    /// Gets the argument at `index` as `T`
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if fewer arguments were passed
    /// - Returns [`InstantiateErrorKind::IncorrectArgumentType`] if the argument holds another type
    pub fn get<T: SendSafety + SyncSafety + 'static>(&self, index: usize) -> InstantiateResult<RcThreadSafety<T>> {
        let value = self.value(index)?;
        value.downcast().ok_or_else(|| InstantiateErrorKind::IncorrectArgumentType {
            index,
            expected: TypeInfo::of::<T>(),
            actual: value.type_info(),
        })
    }

    #[inline]
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

type BoxedCall = BoxFnThreadSafety<Arguments, InstantiateResult<Value>>;

struct FunctionInner {
    source: Cow<'static, str>,
    signature: Signature,
    call: BoxedCall,
}

/// Callable with its source text.
///
/// The parameters the registry injects are taken from the source text,
/// the closure receives them resolved, in declared order.
///
/// # Examples
/// ```rust
/// use paramdi::{Function, Registry, Value};
///
/// let registry = Registry::new("app");
/// registry.constant("greeting", "hello");
///
/// let function = Function::new("(greeting) => greeting + ' world'", |args| {
///     let greeting = args.get::<&str>(0)?;
///     Ok(Value::new(format!("{greeting} world")))
/// });
///
/// let value = registry.invoke(None, &function).unwrap();
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "hello world");
/// ```
#[derive(Clone)]
pub struct Function {
    inner: RcThreadSafety<FunctionInner>,
}

impl Function {
    #[must_use]
    pub fn new<F>(source: impl Into<Cow<'static, str>>, call: F) -> Self
    where
        F: Fn(Arguments) -> InstantiateResult<Value> + SendSafety + SyncSafety + 'static,
    {
        let source = source.into();
        let signature = Signature::extract(&source);

        Self {
            inner: RcThreadSafety::new(FunctionInner {
                source,
                signature,
                call: Box::new(call),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    #[inline]
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    /// Calls the function with already resolved arguments
    ///
    /// # Errors
    /// Returns the error of the function
    #[inline]
    pub fn call(&self, arguments: Arguments) -> InstantiateResult<Value> {
        (self.inner.call)(arguments)
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        RcThreadSafety::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("source", &self.inner.source)
            .field("signature", &self.inner.signature)
            .finish_non_exhaustive()
    }
}

struct ClassInner {
    source: Cow<'static, str>,
    signature: Signature,
    type_info: TypeInfo,
    construct: BoxedCall,
}

/// Constructible type with its source text.
///
/// Injected parameters are taken from the `constructor` of the class source,
/// a function source is also accepted and its own parameters are used.
/// Every construction builds a new instance.
#[derive(Clone)]
pub struct Class {
    inner: RcThreadSafety<ClassInner>,
}

impl Class {
    #[must_use]
    pub fn new<T, F>(source: impl Into<Cow<'static, str>>, construct: F) -> Self
    where
        T: SendSafety + SyncSafety + 'static,
        F: Fn(Arguments) -> InstantiateResult<T> + SendSafety + SyncSafety + 'static,
    {
        let source = source.into();
        let signature = Signature::extract(&source);

        Self {
            inner: RcThreadSafety::new(ClassInner {
                source,
                signature,
                type_info: TypeInfo::of::<T>(),
                construct: Box::new(move |arguments| construct(arguments).map(Value::new)),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    #[inline]
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    /// Type of the instances the class constructs
    #[inline]
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.inner.type_info
    }

    /// Builds a new instance from already resolved arguments
    ///
    /// # Errors
    /// Returns the error of the constructor
    #[inline]
    pub fn construct(&self, arguments: Arguments) -> InstantiateResult<Value> {
        (self.inner.construct)(arguments)
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("type", &self.inner.type_info.name)
            .field("signature", &self.inner.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{Arguments, Class, Function};
    use crate::{any::Value, errors::InstantiateErrorKind};

    struct Logger;
    struct Service(u8);

    #[test]
    fn test_function_signature() {
        let function = Function::new("function (a, b = logger) {}", |_| Ok(Value::new(())));

        assert_eq!(function.signature().injection_keys(), ["a", "logger"]);
        assert_eq!(function.source(), "function (a, b = logger) {}");
    }

    #[test]
    fn test_function_call() {
        let function = Function::new("(a, b) => a + b", |args| {
            let a = args.get::<u8>(0)?;
            let b = args.get::<u8>(1)?;
            Ok(Value::new(*a + *b))
        });

        let value = function
            .call(Arguments::new(None, Vec::from([Value::new(1u8), Value::new(2u8)])))
            .unwrap();
        assert_eq!(*value.downcast_ref::<u8>().unwrap(), 3);
    }

    #[test]
    fn test_arguments_errors() {
        let arguments = Arguments::new(None, Vec::from([Value::new(1u8)]));

        assert!(matches!(arguments.get::<u8>(1), Err(InstantiateErrorKind::MissingArgument { index: 1, len: 1 })));
        assert!(matches!(
            arguments.get::<Logger>(0),
            Err(InstantiateErrorKind::IncorrectArgumentType { index: 0, .. })
        ));
        assert!(matches!(arguments.this_as::<Logger>(), Err(InstantiateErrorKind::MissingThis)));
    }

    #[test]
    fn test_this() {
        let arguments = Arguments::new(Some(Value::new(Logger)), Vec::new());

        assert!(arguments.this_as::<Logger>().is_ok());
        assert!(matches!(arguments.this_as::<u8>(), Err(InstantiateErrorKind::IncorrectThisType { .. })));
    }

    #[test]
    fn test_class_construct() {
        let class = Class::new("class Service { constructor(id) { this.id = id; } }", |args| {
            Ok(Service(*args.get::<u8>(0)?))
        });

        assert_eq!(class.signature().names(), ["id"]);
        assert!(class.type_info().name.ends_with("Service"));

        let arguments = Arguments::new(None, Vec::from([Value::new(7u8)]));
        let instance_1 = class.construct(arguments.clone()).unwrap();
        let instance_2 = class.construct(arguments).unwrap();

        assert_eq!(instance_1.downcast_ref::<Service>().unwrap().0, 7);
        assert!(!instance_1.ptr_eq(&instance_2));
    }
}

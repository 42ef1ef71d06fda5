use core::{
    any::{type_name, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    ptr,
};

use crate::utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

/// Type-erased shared value stored in and produced by a [`crate::Registry`].
///
/// Cloning a value is cheap and keeps pointing at the same instance,
/// use [`Value::ptr_eq`] to check instance identity.
#[derive(Clone)]
pub struct Value {
    inner: RcAnyThreadSafety,
    type_info: TypeInfo,
}

impl Value {
    #[inline]
    #[must_use]
    pub fn new<T: SendSafety + SyncSafety + 'static>(val: T) -> Self {
        Self::from_rc(RcThreadSafety::new(val))
    }

    #[inline]
    #[must_use]
    pub fn from_rc<T: SendSafety + SyncSafety + 'static>(val: RcThreadSafety<T>) -> Self {
        Self {
            inner: val,
            type_info: TypeInfo::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }

    #[inline]
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    #[inline]
    #[must_use]
    pub fn downcast<T: SendSafety + SyncSafety + 'static>(&self) -> Option<RcThreadSafety<T>> {
        self.inner.clone().downcast().ok()
    }

    /// Returns `true` if both values point to the same instance
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ptr::addr_eq(RcThreadSafety::as_ptr(&self.inner), RcThreadSafety::as_ptr(&other.inner))
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.type_info.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{TypeInfo, Value};

    struct Request(u8);

    #[test]
    fn test_downcast() {
        let value = Value::new(Request(1));

        assert!(value.is::<Request>());
        assert!(!value.is::<u8>());
        assert_eq!(value.downcast_ref::<Request>().unwrap().0, 1);
        assert_eq!(value.downcast::<Request>().unwrap().0, 1);
        assert!(value.downcast::<u8>().is_none());
        assert_eq!(value.type_info(), TypeInfo::of::<Request>());
    }

    #[test]
    fn test_ptr_eq() {
        let value_1 = Value::new(Request(1));
        let value_2 = value_1.clone();
        let value_3 = Value::new(Request(1));

        assert!(value_1.ptr_eq(&value_2));
        assert!(!value_1.ptr_eq(&value_3));
    }

    #[test]
    fn test_short_name() {
        assert_eq!(TypeInfo::of::<Request>().short_name(), "Request");
        assert_eq!(TypeInfo::of::<u8>().short_name(), "u8");
    }
}

#[cfg(feature = "thread_safe")]
mod thread_safe {
    use alloc::{boxed::Box, sync::Arc};
    use core::any::Any;
    use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

    pub trait SendSafety: Send {}
    pub trait SyncSafety: Sync {}

    impl<T: Send> SendSafety for T {}
    impl<T: Sync> SyncSafety for T {}

    pub type RcThreadSafety<T> = Arc<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any + Send + Sync>;
    pub type BoxFnThreadSafety<Args, Ret> = Box<dyn Fn(Args) -> Ret + Send + Sync>;

    /// Lock that can be taken again by the thread holding it
    pub struct ReentrantLockThreadSafety(ReentrantMutex<()>);

    impl ReentrantLockThreadSafety {
        #[inline]
        #[must_use]
        pub fn new() -> Self {
            Self(ReentrantMutex::new(()))
        }

        #[inline]
        pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
            self.0.lock()
        }
    }
}

#[cfg(not(feature = "thread_safe"))]
mod thread_unsafe {
    use alloc::{boxed::Box, rc::Rc};
    use core::{any::Any, marker::PhantomData};

    pub trait SendSafety {}
    pub trait SyncSafety {}

    impl<T> SendSafety for T {}
    impl<T> SyncSafety for T {}

    pub type RcThreadSafety<T> = Rc<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any>;
    pub type BoxFnThreadSafety<Args, Ret> = Box<dyn Fn(Args) -> Ret>;

    /// Without thread safety there is nothing to wait for, locking is a no-op
    pub struct ReentrantLockThreadSafety;

    impl ReentrantLockThreadSafety {
        #[inline]
        #[must_use]
        pub const fn new() -> Self {
            Self
        }

        #[inline]
        pub fn lock(&self) -> PhantomData<&Self> {
            PhantomData
        }
    }
}

#[cfg(feature = "thread_safe")]
pub use thread_safe::{RcThreadSafety, SendSafety, SyncSafety};
#[cfg(feature = "thread_safe")]
pub(crate) use thread_safe::{BoxFnThreadSafety, RcAnyThreadSafety, ReentrantLockThreadSafety};

#[cfg(not(feature = "thread_safe"))]
pub use thread_unsafe::{RcThreadSafety, SendSafety, SyncSafety};
#[cfg(not(feature = "thread_safe"))]
pub(crate) use thread_unsafe::{BoxFnThreadSafety, RcAnyThreadSafety, ReentrantLockThreadSafety};

mod extend;
mod instantiate;
mod resolve;

pub use extend::ExtendErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use resolve::ResolveErrorKind;

pub type InstantiateResult<T> = Result<T, InstantiateErrorKind>;

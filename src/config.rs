/// Config for a provider binding
/// ## Fields
/// - `cache_provides`:
///   If `true`, the provider is invoked on the first lookup only and its result
///   replaces the binding as a constant for every later lookup.
///
///   If `false`, the provider is invoked on every lookup of its key.
///   This does **not** affect the dependencies of the provider,
///   they are resolved with their own bindings.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub cache_provides: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { cache_provides: true }
    }
}

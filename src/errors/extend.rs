use alloc::string::String;

#[derive(thiserror::Error, Debug)]
pub enum ExtendErrorKind {
    #[error("Cyclic delegation detected: \"{parent}\" already delegates to \"{registry}\"")]
    CyclicDelegation { registry: String, parent: String },
}

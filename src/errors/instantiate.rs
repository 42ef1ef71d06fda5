use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Argument {index} not passed. Passed arguments: {len}")]
    MissingArgument { index: usize, len: usize },
    #[error("Incorrect argument {index} type. Actual: {}, expected: {}", actual.name, expected.name)]
    IncorrectArgumentType {
        index: usize,
        expected: TypeInfo,
        actual: TypeInfo,
    },
    #[error("Receiver not bound")]
    MissingThis,
    #[error("Incorrect receiver type. Actual: {}, expected: {}", actual.name, expected.name)]
    IncorrectThisType { expected: TypeInfo, actual: TypeInfo },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

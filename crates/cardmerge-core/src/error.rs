use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("merge requires exactly two record sets, got {0}")]
    WrongCardinality(usize),
    #[error("structural field cannot be remapped: {0}")]
    StructuralField(String),
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("record index out of range: {0}")]
    RecordOutOfRange(usize),
}

pub type Result<T> = std::result::Result<T, CoreError>;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("behavior factory \"{0}\" not found")]
    FactoryNotFound(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

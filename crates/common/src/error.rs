use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Topping catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Backend request failed: {0}")]
    Backend(String),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("No call options selected")]
    EmptySelection,

    #[error("Invalid simulation transition: {action} is not allowed from {from}")]
    InvalidTransition { from: String, action: String },

    #[error("Invalid quiz choice: {0}")]
    InvalidQuizChoice(usize),

    #[error("Invalid call timing: {0}")]
    InvalidTiming(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no records provided for generator")]
    NoRecords,

    #[error("formatting generated code with {formatter}: {message}")]
    Format {
        formatter: &'static str,
        message: String,
    },
}

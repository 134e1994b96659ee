use thiserror::Error;

#[derive(Error, Debug)]
pub enum PedError {
    #[error("Enumeration cap exceeded: {count} {what} (maximum is {max})")]
    CapacityExceeded {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),
}

pub type Result<T> = std::result::Result<T, PedError>;

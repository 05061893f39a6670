use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid address length: {0}")]
    InvalidAddressLength(usize),

    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

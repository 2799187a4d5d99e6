use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A piece that fits the stock in neither orientation.
    #[error("piece {width}x{height} does not fit in stock {stock_width}x{stock_height}")]
    UnplaceablePiece {
        width: f64,
        height: f64,
        stock_width: f64,
        stock_height: f64,
    },

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;

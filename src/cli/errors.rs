use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Invalid bounding box: expected 4 values, got {count}")]
    InvalidBbox { count: usize },

    #[error(transparent)]
    Run(#[from] sarprep::Error),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

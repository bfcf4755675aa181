use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Decode(#[from] decoder::Error),

    #[error("invalid colour {value:?}: {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("could not encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

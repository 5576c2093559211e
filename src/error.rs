use thiserror::Error;

pub type ScaleBarResult<T> = Result<T, ScaleBarError>;

#[derive(Debug, Error)]
pub enum ScaleBarError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("invalid CRS `{0}`")]
    InvalidCrs(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("render backend error: {0}")]
    Backend(String),
}

impl ScaleBarError {
    pub(crate) fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

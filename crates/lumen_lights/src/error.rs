use crate::storage::NativeLight;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LightError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },

    #[error("unknown uniform `{key}`")]
    UnknownUniform { key: String },

    #[error("light storage has no light {0:?}")]
    UnknownLight(NativeLight),
}

impl LightError {
    pub fn invalid_argument(name: &'static str, reason: &'static str) -> Self {
        LightError::InvalidArgument { name, reason }
    }

    pub fn unknown_uniform<T: ToString>(key: T) -> Self {
        LightError::UnknownUniform {
            key: key.to_string(),
        }
    }
}

pub type LightResult<T> = Result<T, LightError>;

/// Rejects empty strings before anything reaches the storage.
pub fn check_not_empty(name: &'static str, value: &str) -> LightResult<()> {
    if value.is_empty() {
        return Err(LightError::invalid_argument(name, "cannot be empty"));
    }
    Ok(())
}

/// Rejects NaN and +/- infinity.
pub fn check_finite(name: &'static str, value: f32) -> LightResult<()> {
    if value.is_nan() {
        return Err(LightError::invalid_argument(name, "cannot be NaN"));
    }
    if value.is_infinite() {
        return Err(LightError::invalid_argument(name, "cannot be infinite"));
    }
    Ok(())
}

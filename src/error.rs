pub type PosterResult<T> = Result<T, PosterError>;

#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("patch error: {0}")]
    Patch(String),

    #[error("collaborator error: {0}")]
    Collaborator(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("undo history is empty")]
    HistoryEmpty,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn patch(msg: impl Into<String>) -> Self {
        Self::Patch(msg.into())
    }

    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            PosterError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(PosterError::patch("x").to_string().contains("patch error:"));
        assert!(
            PosterError::collaborator("x")
                .to_string()
                .contains("collaborator error:")
        );
        assert!(
            PosterError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn history_empty_is_its_own_variant() {
        assert_eq!(
            PosterError::HistoryEmpty.to_string(),
            "undo history is empty"
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = PosterError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}

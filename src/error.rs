//! Error taxonomy shared by every survey operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SurveyError>;

#[derive(Debug, Error)]
pub enum SurveyError {
    /// Unknown user, survey or option id.
    #[error("{entity} {id} was not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Caller input was rejected; `field` names the offending input so it can be corrected.
    #[error("invalid {field}: {message}")]
    ValidationFailed { field: &'static str, message: String },

    /// Anonymous or non-owner caller, or failed login. The message never says whether the
    /// resource exists.
    #[error("{0}")]
    Unauthorized(String),

    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    /// The chosen option does not exist or belongs to another survey.
    #[error("option {option_id} is not a choice of survey {survey_id}")]
    InvalidOption { survey_id: i64, option_id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("export error: {0}")]
    Export(#[from] csv::Error),

    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl SurveyError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::ValidationFailed { field, message: message.into() }
    }

    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// True for errors caused by the caller's request rather than by the store.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::ValidationFailed { .. }
                | Self::Unauthorized(_)
                | Self::IntegrityViolation(_)
                | Self::InvalidOption { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_separated_from_infrastructure_failures() {
        assert!(SurveyError::not_found("survey", 4).is_rejection());
        assert!(SurveyError::validation("title", "required").is_rejection());
        assert!(SurveyError::InvalidOption { survey_id: 1, option_id: 9 }.is_rejection());
        assert!(!SurveyError::Storage(sqlx::Error::RowNotFound).is_rejection());
        assert!(!SurveyError::PasswordHash("bad salt".to_owned()).is_rejection());
    }

    #[test]
    fn messages_name_the_offending_input() {
        let e = SurveyError::validation("options", "at least 2 options are required");
        assert_eq!(e.to_string(), "invalid options: at least 2 options are required");

        let e = SurveyError::InvalidOption { survey_id: 3, option_id: 12 };
        assert_eq!(e.to_string(), "option 12 is not a choice of survey 3");
    }
}

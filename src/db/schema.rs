use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Filled from `survey_options` in insertion order.
    #[sqlx(skip)]
    pub options: Vec<SurveyOption>,
}

impl Survey {
    pub fn option(&self, id_option: i64) -> Option<&SurveyOption> {
        self.options.iter().find(|opt| opt.id == id_option)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SurveyOption {
    pub id: i64,
    pub survey_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Response {
    pub id: i64,
    pub survey_id: i64,
    pub option_id: i64,
    pub respondent_email: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

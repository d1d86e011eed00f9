use evlog::meta;
use sqlx::SqlitePool;

use crate::db;
use crate::db::schema::Survey;
use crate::error::{Result, SurveyError};
use crate::runtime::get_logger;
use crate::support::sanitize::{check_len, escape_markup, non_blank};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 10;
pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const OPTION_MAX_LEN: usize = 200;

const NOT_PERMITTED: &str = "You do not have permission to access this survey.";

/// Validated, markup-escaped input for a new survey.
#[derive(Debug, PartialEq, Eq)]
struct NewSurvey {
    title: String,
    description: Option<String>,
    options: Vec<String>,
}

fn clean_new_survey<S: AsRef<str>>(title: &str, description: Option<&str>, option_texts: &[S]) -> Result<NewSurvey> {
    let title = match non_blank(title) {
        None => return Err(SurveyError::validation("title", "is required")),
        Some(v) => v,
    };
    check_len("title", title, TITLE_MAX_LEN)?;

    let description = description.and_then(non_blank);
    if let Some(description) = description {
        check_len("description", description, DESCRIPTION_MAX_LEN)?;
    }

    if option_texts.len() > MAX_OPTIONS {
        return Err(SurveyError::validation(
            "options",
            format!("at most {} options may be given; got {}", MAX_OPTIONS, option_texts.len()),
        ));
    }

    let mut options = Vec::new();
    for text in option_texts {
        // Blank entries are dropped and do not count towards the minimum.
        let text = match non_blank(text.as_ref()) {
            None => continue,
            Some(v) => v,
        };
        check_len("options", text, OPTION_MAX_LEN)?;
        options.push(escape_markup(text));
    }

    if options.len() < MIN_OPTIONS {
        return Err(SurveyError::validation(
            "options",
            format!("at least {} non-empty options are required; got {}", MIN_OPTIONS, options.len()),
        ));
    }

    Ok(NewSurvey {
        title: escape_markup(title),
        description: description.map(escape_markup),
        options,
    })
}

/// Creates a survey owned by `owner`. The survey and its options become visible together.
pub async fn create_survey<S: AsRef<str>>(
    conn: &SqlitePool,
    owner: Option<i64>,
    title: &str,
    description: Option<&str>,
    option_texts: &[S],
) -> Result<Survey> {
    let id_owner = match owner {
        None => return Err(SurveyError::Unauthorized("Please log in to create a survey.".to_owned())),
        Some(v) => v,
    };

    let new = match clean_new_survey(title, description, option_texts) {
        Ok(v) => v,
        Err(e) => {
            get_logger().info("Rejected survey creation.", meta! {
                "OwnerID" => id_owner,
                "Reason" => e,
            });
            return Err(e);
        }
    };

    let survey = db::model::add_survey(conn, id_owner, &new.title, new.description.as_deref(), &new.options).await?;

    get_logger().info("Survey created.", meta! {
        "SurveyID" => survey.id,
        "OwnerID" => id_owner,
        "Options" => survey.options.len(),
    });

    Ok(survey)
}

pub async fn get_survey(conn: &SqlitePool, id_survey: i64) -> Result<Survey> {
    db::model::get_survey(conn, id_survey)
        .await?
        .ok_or_else(|| SurveyError::not_found("survey", id_survey))
}

/// Surveys created by `caller`. Anonymous callers see nothing.
pub async fn list_surveys_owned_by(conn: &SqlitePool, caller: Option<i64>) -> Result<Vec<Survey>> {
    match caller {
        None => Ok(Vec::new()),
        Some(id_owner) => db::model::list_surveys_by_creator(conn, id_owner).await,
    }
}

/// Loads a survey for an owner-only operation.
pub async fn owned_survey(conn: &SqlitePool, caller: Option<i64>, id_survey: i64) -> Result<Survey> {
    let id_caller = match caller {
        None => return Err(SurveyError::Unauthorized("Please log in to access this page.".to_owned())),
        Some(v) => v,
    };

    let survey = get_survey(conn, id_survey).await?;

    if survey.creator_id != id_caller {
        get_logger().info("Non-owner attempted to access survey.", meta! {
            "SurveyID" => id_survey,
            "CallerID" => id_caller,
        });
        return Err(SurveyError::Unauthorized(NOT_PERMITTED.to_owned()));
    }

    Ok(survey)
}

/// Deletes a survey together with its options and responses. Owner only.
pub async fn delete_survey(conn: &SqlitePool, caller: Option<i64>, id_survey: i64) -> Result<()> {
    let survey = owned_survey(conn, caller, id_survey).await?;

    if !db::model::delete_survey(conn, survey.id).await? {
        return Err(SurveyError::not_found("survey", id_survey));
    }

    get_logger().info("Survey deleted.", meta! {
        "SurveyID" => survey.id,
        "OwnerID" => survey.creator_id,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn blank_options_are_dropped_not_counted() {
        let new = clean_new_survey("T", Some("D"), &["A", "", " ", "B"]).unwrap();
        assert_eq!(new.options, vec!["A", "B"]);
        assert_eq!(new.description.as_deref(), Some("D"));
    }

    #[test]
    fn text_is_trimmed_and_escaped() {
        let new = clean_new_survey("  <b>Lunch</b> ", Some("   "), &[" Fish & Chips ", "<script>x</script>"]).unwrap();
        assert_eq!(new.title, "&lt;b&gt;Lunch&lt;/b&gt;");
        assert_eq!(new.description, None);
        assert_eq!(new.options, vec!["Fish &amp; Chips", "&lt;script&gt;x&lt;/script&gt;"]);

        let new = clean_new_survey("Say \"cheese\"", None, &["Don't know", "Yes"]).unwrap();
        assert_eq!(new.title, "Say \"cheese\"");
        assert_eq!(new.options[0], "Don't know");
    }

    #[rstest]
    #[case("", &["A", "B"], "title")]
    #[case("   ", &["A", "B"], "title")]
    #[case("T", &["A"], "options")]
    #[case("T", &["A", " ", ""], "options")]
    #[case("T", &[], "options")]
    #[case("T", &["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"], "options")]
    fn invalid_surveys_name_the_field(#[case] title: &str, #[case] options: &[&str], #[case] field: &str) {
        match clean_new_survey(title, None, options) {
            Err(SurveyError::ValidationFailed { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected validation failure on {}, got {:?}", field, other),
        }
    }

    #[test]
    fn ten_options_are_accepted() {
        let options: Vec<String> = (1..=10).map(|i| format!("Option {}", i)).collect();
        assert_eq!(clean_new_survey("T", None, &options).unwrap().options.len(), 10);
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let long_title = "t".repeat(TITLE_MAX_LEN + 1);
        assert!(matches!(
            clean_new_survey(&long_title, None, &["A", "B"]),
            Err(SurveyError::ValidationFailed { field: "title", .. })
        ));

        let long_description = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        assert!(matches!(
            clean_new_survey("T", Some(long_description.as_str()), &["A", "B"]),
            Err(SurveyError::ValidationFailed { field: "description", .. })
        ));

        let long_option = "o".repeat(OPTION_MAX_LEN + 1);
        assert!(matches!(
            clean_new_survey("T", None, &["A", long_option.as_str()]),
            Err(SurveyError::ValidationFailed { field: "options", .. })
        ));
    }
}

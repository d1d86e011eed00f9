use std::fmt::Write;

use itertools::Itertools;

use crate::db::schema::Survey;
use crate::survey::SurveyResults;

pub fn survey_summary(survey: &Survey) -> String {
    let mut res_string = format!("**{}** (survey {})\n", survey.title, survey.id);

    if let Some(description) = &survey.description {
        let _ = writeln!(res_string, "{}", description);
    }

    for (i, opt) in survey.options.iter().enumerate() {
        let _ = writeln!(res_string, "**{}.** {} [option {}]", i + 1, opt.text, opt.id);
    }

    res_string
}

pub fn survey_list(surveys: &[Survey]) -> String {
    if surveys.is_empty() {
        return "You have not created any surveys yet.".to_owned();
    }

    surveys.iter()
        .map(|s| format!("{}. {} ({} options)", s.id, s.title, s.options.len()))
        .join("\n")
}

pub fn survey_results(results: &SurveyResults) -> String {
    let mut res_string = format!("Results - {}\nTotal responses: {}\n", results.title, results.total_responses);

    for opt in &results.options {
        let _ = writeln!(res_string, "**{}**: {} ({:.1}%)", opt.text, opt.count, opt.percentage);
        for comment in &opt.comments {
            let _ = writeln!(res_string, "    \"{}\"", comment);
        }
    }

    res_string
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::schema::SurveyOption;
    use crate::survey::OptionResult;

    #[test]
    fn results_show_counts_percentages_and_comments() {
        let results = SurveyResults {
            survey_id: 1,
            title: "Service Feedback".to_owned(),
            total_responses: 2,
            options: vec![
                OptionResult {
                    option_id: 1,
                    text: "Excellent".to_owned(),
                    count: 1,
                    percentage: 50.0,
                    comments: vec!["Great service!".to_owned()],
                },
                OptionResult { option_id: 2, text: "Good".to_owned(), count: 1, percentage: 50.0, comments: vec![] },
            ],
        };

        assert_eq!(
            survey_results(&results),
            "Results - Service Feedback\nTotal responses: 2\n\
             **Excellent**: 1 (50.0%)\n    \"Great service!\"\n\
             **Good**: 1 (50.0%)\n"
        );
    }

    #[test]
    fn empty_survey_list_has_a_message() {
        assert_eq!(survey_list(&[]), "You have not created any surveys yet.");

        let survey = Survey {
            id: 4,
            title: "Lunch".to_owned(),
            description: None,
            creator_id: 1,
            created_at: Utc::now(),
            updated_at: None,
            options: vec![
                SurveyOption { id: 1, survey_id: 4, text: "Pizza".to_owned() },
                SurveyOption { id: 2, survey_id: 4, text: "Soup".to_owned() },
            ],
        };
        assert_eq!(survey_list(&[survey]), "4. Lunch (2 options)");
    }
}

//! Survey catalog, response ledger, aggregation and export.
//!
//! Every operation takes the store and, where access matters, the caller's user id explicitly;
//! `None` stands for an anonymous caller.

pub mod aggregate;
pub mod catalog;
pub mod export;
pub mod identity;
pub mod ledger;

pub use aggregate::{aggregate, survey_results, OptionResult, SurveyResults};
pub use catalog::{create_survey, delete_survey, get_survey, list_surveys_owned_by, owned_survey};
pub use export::{export_csv, export_filename, export_results, ExportDocument};
pub use identity::{authenticate, get_user, register_user};
pub use ledger::{list_responses, submit_response};

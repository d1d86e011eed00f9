use crate::error::{Result, SurveyError};

/// One `--name [value]` pair from the command line. Flags carry no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOpt {
    pub name: String,
    pub value: Option<String>,
}

/// Splits `--name value` and `--name=value` pairs. A bare `--name` followed by another `--name`
/// or by nothing is a flag; values starting with `--` need the `=` form.
pub fn parse_opts(args: &[String]) -> Result<Vec<CommandOpt>> {
    let mut opts = Vec::new();
    let mut args = args.iter().peekable();

    while let Some(arg) = args.next() {
        let name = match arg.strip_prefix("--") {
            Some(v) if !v.is_empty() => v,
            _ => {
                return Err(SurveyError::validation(
                    "arguments",
                    format!("unexpected argument '{}'; options must look like --name value", arg),
                ));
            }
        };

        if let Some((name, value)) = name.split_once('=') {
            if name.is_empty() {
                return Err(SurveyError::validation("arguments", format!("option '{}' has no name", arg)));
            }
            opts.push(CommandOpt { name: name.to_owned(), value: Some(value.to_owned()) });
            continue;
        }

        let value = match args.peek() {
            Some(next) if !next.starts_with("--") => args.next().cloned(),
            _ => None,
        };

        opts.push(CommandOpt { name: name.to_owned(), value });
    }

    Ok(opts)
}

pub fn find_string_opt(opts: &[CommandOpt], name: &str) -> Option<String> {
    opts.iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.clone())
}

/// Every value given for a repeatable option, in command-line order.
pub fn find_string_opts(opts: &[CommandOpt], name: &str) -> Vec<String> {
    opts.iter()
        .filter(|opt| opt.name == name)
        .filter_map(|opt| opt.value.clone())
        .collect()
}

pub fn find_integer_opt(opts: &[CommandOpt], name: &str) -> Option<i64> {
    find_string_opt(opts, name).and_then(|v| v.trim().parse::<i64>().ok())
}

pub fn find_flag(opts: &[CommandOpt], name: &str) -> bool {
    opts.iter().any(|opt| opt.name == name)
}

/// Looks an option up with `finder`, rejecting the command when it is missing or malformed.
pub fn find_required<T>(
    opts: &[CommandOpt],
    finder: fn(&[CommandOpt], &str) -> Option<T>,
    name: &'static str,
) -> Result<T> {
    match finder(opts, name) {
        Some(v) => Ok(v),
        None => Err(SurveyError::validation(name, format!("--{} is missing or malformed", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_values_flags_and_repeats() {
        let opts = parse_opts(&args(&[
            "--survey", "3", "--include-email", "--option", "A", "--option", "B", "--comment", "",
        ])).unwrap();

        assert_eq!(find_integer_opt(&opts, "survey"), Some(3));
        assert!(find_flag(&opts, "include-email"));
        assert!(!find_flag(&opts, "verbose"));
        assert_eq!(find_string_opts(&opts, "option"), vec!["A", "B"]);
        assert_eq!(find_string_opt(&opts, "include-email"), None);
        assert_eq!(find_string_opt(&opts, "comment"), Some(String::new()));
    }

    #[test]
    fn values_may_contain_spaces() {
        let opts = parse_opts(&args(&["--title", "Service Feedback", "--description", "Let us know."])).unwrap();

        assert_eq!(find_string_opt(&opts, "title").as_deref(), Some("Service Feedback"));
        assert_eq!(find_string_opt(&opts, "description").as_deref(), Some("Let us know."));
    }

    #[test]
    fn equals_form_keeps_dashed_values() {
        let opts = parse_opts(&args(&["--comment=--", "--title=a=b", "--description=", "--include-email"])).unwrap();

        assert_eq!(find_string_opt(&opts, "comment").as_deref(), Some("--"));
        assert_eq!(find_string_opt(&opts, "title").as_deref(), Some("a=b"));
        assert_eq!(find_string_opt(&opts, "description"), Some(String::new()));
        assert!(find_flag(&opts, "include-email"));

        assert!(parse_opts(&args(&["--=x"])).is_err());
    }

    #[test]
    fn stray_positional_arguments_are_rejected() {
        assert!(parse_opts(&args(&["survey", "3"])).is_err());
        assert!(parse_opts(&args(&["--", "3"])).is_err());
    }

    #[test]
    fn missing_required_option_names_the_option() {
        let opts = parse_opts(&args(&["--survey", "abc"])).unwrap();

        let err = find_required(&opts, find_integer_opt, "survey").unwrap_err();
        assert_eq!(err.to_string(), "invalid survey: --survey is missing or malformed");

        let err = find_required(&opts, find_string_opt, "email").unwrap_err();
        assert!(matches!(err, SurveyError::ValidationFailed { field: "email", .. }));
    }
}

// ABOUTME: Rule-based validation of provider request fields before they are sent upstream
// ABOUTME: Produces an ordered list of human-readable messages backed by validator error values

use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use validator::ValidationError;

/// Request fields keyed by parameter name
pub type FieldMap = BTreeMap<String, String>;

/// A single constraint applied to one field
///
/// Only `Required` fires for a missing or blank value; every other rule is
/// skipped when there is nothing to check.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Field must be present and not blank
    Required,
    /// Value must parse as a number
    Numeric,
    /// Value must have at least this many characters
    MinLength(usize),
    /// Value must have at most this many characters
    MaxLength(usize),
    /// Value must match the pattern
    Pattern(Regex),
    /// Value must be one of the listed options
    OneOf(Vec<String>),
}

impl Rule {
    /// Build a `Pattern` rule, failing on an invalid expression
    pub fn pattern(expr: &str) -> Result<Self, regex::Error> {
        Ok(Rule::Pattern(Regex::new(expr)?))
    }

    /// Build a `OneOf` rule from any list of options
    pub fn one_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::OneOf(options.into_iter().map(Into::into).collect())
    }

    fn check(&self, field: &str, value: Option<&str>) -> Option<ValidationError> {
        let label = field.replace('_', " ");
        let value = value.filter(|v| !v.trim().is_empty());

        let value = match (self, value) {
            (Rule::Required, None) => {
                return Some(failure(
                    "required",
                    format!("The {label} field is required."),
                ));
            }
            (_, None) | (Rule::Required, Some(_)) => return None,
            (_, Some(value)) => value,
        };

        match self {
            Rule::Numeric if value.trim().parse::<f64>().is_err() => {
                Some(failure("numeric", format!("The {label} must be a number.")))
            }
            Rule::MinLength(min) if value.chars().count() < *min => {
                let mut err = failure(
                    "min_length",
                    format!("The {label} must be at least {min} characters."),
                );
                err.add_param(Cow::Borrowed("min"), min);
                Some(err)
            }
            Rule::MaxLength(max) if value.chars().count() > *max => {
                let mut err = failure(
                    "max_length",
                    format!("The {label} may not be greater than {max} characters."),
                );
                err.add_param(Cow::Borrowed("max"), max);
                Some(err)
            }
            Rule::Pattern(regex) if !regex.is_match(value) => {
                Some(failure("pattern", format!("The {label} format is invalid.")))
            }
            Rule::OneOf(options) if !options.iter().any(|o| o == value) => {
                Some(failure("one_of", format!("The selected {label} is invalid.")))
            }
            _ => None,
        }
    }
}

fn failure(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Ordered set of per-field rules supplied by a provider
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(String, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for a field; fields are checked in insertion order
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name.into(), rules.into_iter().collect()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check every rule against the data
    ///
    /// All failing rules are reported, not only the first one per field.
    pub fn validate(&self, data: &FieldMap) -> Result<(), ValidationFailure> {
        let errors: Vec<(String, ValidationError)> = self
            .fields
            .iter()
            .flat_map(|(field, rules)| {
                let value = data.get(field).map(String::as_str);
                rules
                    .iter()
                    .filter_map(move |rule| rule.check(field, value))
                    .map(move |err| (field.clone(), err))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { errors })
        }
    }
}

/// Every rule violation found in one validation pass
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    errors: Vec<(String, ValidationError)>,
}

impl ValidationFailure {
    /// Violations paired with the field they belong to
    pub fn errors(&self) -> &[(String, ValidationError)] {
        &self.errors
    }

    /// Human-readable messages in rule order
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|(field, err)| match &err.message {
                Some(message) => message.to_string(),
                None => format!("The {field} is invalid."),
            })
            .collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(" "))
    }
}

impl std::error::Error for ValidationFailure {}

//! Two-stage request body pipeline.
//!
//! Stage one turns raw bytes into an untyped [`serde_json::Value`]
//! ([`parse_json`]); stage two turns that value into a typed, constraint-checked
//! struct ([`validate`]). Both stages return their failures as values, and
//! each route decides how a failure maps onto a status code.

use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use std::fmt;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: String,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Code: {} ~ Path: {} ~ Message: {}",
            self.code, self.path, self.message
        )
    }
}

/// Non-empty list of violations, ordered by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issues(Vec<Issue>);

impl Issues {
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn single(code: &str, path: &str, message: impl Into<String>) -> Self {
        Self(vec![Issue {
            code: code.to_string(),
            path: path.to_string(),
            message: message.into(),
        }])
    }
}

/// Human-readable rendering used as the 422 `message`.
impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for Issues {
    fn from(errors: ValidationErrors) -> Self {
        let mut issues = Vec::new();
        flatten(&errors, "", &mut issues);
        issues.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.code.cmp(&b.code)));
        Self(issues)
    }
}

#[derive(Debug, Error)]
pub enum BodyError {
    /// Stage one: the bytes are not JSON.
    #[error("request body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Stage two: JSON that does not match the declared shape.
    #[error("{0}")]
    Invalid(Issues),
}

impl BodyError {
    /// Parse failures expressed as a single `invalid_json` issue, so a caller
    /// that treats both stages alike can render one message format.
    pub fn into_issues(self) -> Issues {
        match self {
            BodyError::Parse(e) => Issues::single("invalid_json", "body", e.to_string()),
            BodyError::Invalid(issues) => issues,
        }
    }
}

/// Stage one: bytes to an untyped JSON value.
pub fn parse_json(bytes: &[u8]) -> Result<Value, BodyError> {
    serde_json::from_slice(bytes).map_err(BodyError::Parse)
}

/// Stage two: untyped value to `T`, running serde shape checks then
/// `validator` constraints.
pub fn validate<T>(value: Value) -> Result<T, Issues>
where
    T: DeserializeOwned + Validate,
{
    let typed: T = serde_path_to_error::deserialize(value).map_err(|e| serde_issue(&e))?;
    typed.validate()?;
    Ok(typed)
}

/// Both stages back to back.
pub fn parse_and_validate<T>(bytes: &[u8]) -> Result<T, BodyError>
where
    T: DeserializeOwned + Validate,
{
    let value = parse_json(bytes)?;
    validate(value).map_err(BodyError::Invalid)
}

fn serde_issue(error: &serde_path_to_error::Error<serde_json::Error>) -> Issues {
    let message = error.inner().to_string();
    let parent = error
        .path()
        .iter()
        .map(|segment| match segment {
            Segment::Seq { index } => index.to_string(),
            Segment::Map { key } => key.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".");
    // a missing field is reported at its parent, the field itself only appears in the message
    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());
    let (code, path) = match missing {
        Some(field) => ("required", join(&parent, field)),
        None if parent.is_empty() => ("invalid_type", "body".to_string()),
        None => ("invalid_type", parent),
    };
    Issues::single(code, &path, message)
}

fn flatten(errors: &ValidationErrors, prefix: &str, out: &mut Vec<Issue>) {
    for (field, kind) in errors.errors() {
        let path = join(prefix, &camel_case(field));
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|err| Issue {
                    code: err.code.to_string(),
                    path: path.clone(),
                    message: describe(err),
                }));
            }
            ValidationErrorsKind::Struct(inner) => flatten(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(inner, &format!("{path}.{index}"), out);
                }
            }
        }
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Rust field names to the camelCase used on the wire.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    let param = |name: &str| err.params.get(name).map(|v| v.to_string());
    match err.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "out of range".to_string(),
        },
        "required" => "Required".to_string(),
        other => format!("failed {other} check"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct Inner {
        #[validate(length(min = 1))]
        display_name: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Outer {
        #[validate(nested)]
        inner: Inner,
        #[validate(range(max = 10))]
        count: u32,
    }

    #[test]
    fn test_parse_json_rejects_non_json() {
        let err = parse_json(b"{not json").unwrap_err();
        assert!(matches!(err, BodyError::Parse(_)));
        let issues = err.into_issues();
        assert_eq!(issues.len(), 1);
        assert!(issues.to_string().starts_with("Code: invalid_json ~ Path: body ~ Message: "));
    }

    #[test]
    fn test_parse_json_accepts_any_json() {
        assert_eq!(parse_json(b"42").unwrap(), serde_json::json!(42));
    }

    #[test]
    fn test_validate_reports_nested_paths_in_order() {
        let value = serde_json::json!({"inner": {"displayName": ""}, "count": 11});
        let issues = validate::<Outer>(value).unwrap_err();

        let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, ["count", "inner.displayName"]);
        assert_eq!(
            issues.to_string(),
            "Code: range ~ Path: count ~ Message: must be at most 10 | \
             Code: length ~ Path: inner.displayName ~ Message: length must be at least 1"
        );
    }

    #[test]
    fn test_validate_reports_missing_field() {
        let issues = validate::<Outer>(serde_json::json!({"count": 1})).unwrap_err();
        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.code, "required");
        assert_eq!(issue.path, "inner");
    }

    #[test]
    fn test_validate_reports_wrong_type() {
        let issues = validate::<Outer>(serde_json::json!("nope")).unwrap_err();
        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.code, "invalid_type");
        assert_eq!(issue.path, "body");
    }

    #[test]
    fn test_validate_reports_missing_nested_field_at_full_path() {
        let issues = validate::<Outer>(serde_json::json!({"inner": {}, "count": 1})).unwrap_err();
        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.code, "required");
        assert_eq!(issue.path, "inner.displayName");
    }

    #[test]
    fn test_validate_reports_wrong_nested_type_at_its_path() {
        let value = serde_json::json!({"inner": {"displayName": 5}, "count": 1});
        let issues = validate::<Outer>(value).unwrap_err();
        let issue = issues.iter().next().unwrap();
        assert_eq!(issue.code, "invalid_type");
        assert_eq!(issue.path, "inner.displayName");
        assert!(issue.message.contains("expected a string"));
    }

    #[test]
    fn test_parse_and_validate_success() {
        let ok: Outer =
            parse_and_validate(br#"{"inner":{"displayName":"a"},"count":3}"#).unwrap();
        assert_eq!(ok.count, 3);
        assert_eq!(ok.inner.display_name, "a");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("deliver_after"), "deliverAfter");
        assert_eq!(camel_case("name"), "name");
    }
}

//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose details name the
//! offending field and a stable machine-readable code.

use std::str::FromStr;

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use serde_json::json;

use crate::domain::{
    CommentValidationError, Error, InvalidIdentifier, LoginValidationError, ReviewValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    EmptyField,
    TooLong,
    SurroundingWhitespace,
    OutOfRange,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::TooLong => "too_long",
            ErrorCode::SurroundingWhitespace => "surrounding_whitespace",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

fn field_error(field: &str, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(
        field,
        format!("missing required field: {field}"),
        ErrorCode::MissingField,
    )
}

/// Parse a path identifier, reporting the raw value on failure.
pub(crate) fn parse_id<T>(value: &str, field: &str) -> Result<T, Error>
where
    T: FromStr<Err = InvalidIdentifier>,
{
    value.parse().map_err(|err: InvalidIdentifier| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": field,
            "value": value,
            "code": ErrorCode::InvalidUuid.as_str(),
        }))
    })
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => {
            field_error("username", err.to_string(), ErrorCode::EmptyField)
        }
        LoginValidationError::UsernameWhitespace => field_error(
            "username",
            err.to_string(),
            ErrorCode::SurroundingWhitespace,
        ),
        LoginValidationError::UsernameTooLong { .. } => {
            field_error("username", err.to_string(), ErrorCode::TooLong)
        }
        LoginValidationError::EmptyPassword => {
            field_error("password", err.to_string(), ErrorCode::EmptyField)
        }
    }
}

pub(crate) fn map_review_validation_error(err: ReviewValidationError) -> Error {
    match err {
        ReviewValidationError::EmptyContent => {
            field_error("content", err.to_string(), ErrorCode::EmptyField)
        }
        ReviewValidationError::RatingOutOfRange { .. } => {
            field_error("rating", err.to_string(), ErrorCode::OutOfRange)
        }
    }
}

pub(crate) fn map_comment_validation_error(err: CommentValidationError) -> Error {
    match err {
        CommentValidationError::EmptyContent => {
            field_error("content", err.to_string(), ErrorCode::EmptyField)
        }
    }
}

/// JSON extractor error handler so malformed bodies use the error envelope.
///
/// Deserialiser messages can quote request content, so they are logged at
/// debug level only.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "rejected request body");
    Error::invalid_request("request body is not valid JSON for this endpoint")
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, ReviewId};
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    fn parse_id_accepts_canonical_uuids() {
        let id: ReviewId =
            parse_id("3fa85f64-5717-4562-b3fc-2c963f66afa6", "review_id").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn parse_id_reports_field_and_value() {
        let err = parse_id::<ReviewId>("not-a-uuid", "review_id").expect_err("invalid id");

        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some("review_id"));
        assert_eq!(detail(&err, "value"), Some("not-a-uuid"));
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
    }

    #[rstest]
    #[case(ReviewValidationError::EmptyContent, "content", "empty_field")]
    #[case(
        ReviewValidationError::RatingOutOfRange { min: 1, max: 5 },
        "rating",
        "out_of_range"
    )]
    fn review_validation_errors_name_the_field(
        #[case] input: ReviewValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = map_review_validation_error(input);
        assert_eq!(detail(&err, "field"), Some(field));
        assert_eq!(detail(&err, "code"), Some(code));
    }

    #[rstest]
    fn missing_fields_are_named() {
        let err = missing_field_error("rating");
        assert_eq!(err.message(), "missing required field: rating");
        assert_eq!(detail(&err, "code"), Some("missing_field"));
    }

    #[rstest]
    fn password_errors_do_not_echo_the_password() {
        let err = map_login_validation_error(LoginValidationError::EmptyPassword);
        assert_eq!(detail(&err, "field"), Some("password"));
        assert!(err.details().and_then(|d| d.get("value")).is_none());
    }
}

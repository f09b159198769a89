//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies arrive as loose strings and are parsed here so every
//! endpoint reports field problems with the same `details` shape:
//! `{"field": ..., "code": ..., "value": ...}`.

use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{CleaningMode, Error, PhotoUpload, PhotoValidationError, Resident};

/// Machine-readable reasons attached to validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldErrorCode {
    MissingField,
    InvalidUuid,
    UnknownResident,
    InvalidCleaningMode,
    EmptyName,
    InvalidBase64,
    InvalidPhoto,
}

impl FieldErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::UnknownResident => "unknown_resident",
            Self::InvalidCleaningMode => "invalid_cleaning_mode",
            Self::EmptyName => "empty_name",
            Self::InvalidBase64 => "invalid_base64",
            Self::InvalidPhoto => "invalid_photo",
        }
    }
}

pub(crate) fn field_error(field: &str, code: FieldErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: &str,
    code: FieldErrorCode,
    value: &str,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(
        field,
        FieldErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

/// Parse a path or body identifier.
pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field_value_error(
            field,
            FieldErrorCode::InvalidUuid,
            value,
            format!("{field} must be a valid UUID"),
        )
    })
}

pub(crate) fn parse_resident(value: &str, field: &str) -> Result<Resident, Error> {
    Resident::from_str(value).map_err(|_| {
        field_value_error(
            field,
            FieldErrorCode::UnknownResident,
            value,
            format!("{field} must name a resident of the household"),
        )
    })
}

pub(crate) fn parse_cleaning_mode(value: &str, field: &str) -> Result<CleaningMode, Error> {
    CleaningMode::from_str(value).map_err(|_| {
        field_value_error(
            field,
            FieldErrorCode::InvalidCleaningMode,
            value,
            "cleaning mode must be basic or deep",
        )
    })
}

/// Trimmed, non-empty task name.
pub(crate) fn parse_task_name(value: &str, field: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(field_error(
            field,
            FieldErrorCode::EmptyName,
            "task name must not be empty",
        ));
    }
    Ok(trimmed.to_owned())
}

/// Base64-encoded proof photo.
///
/// Example JSON:
/// `{"fileName":"sink.jpg","contentBase64":"/9j/4AAQ..."}`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPayload {
    pub file_name: Option<String>,
    pub content_base64: Option<String>,
}

/// Decode an optional upload, validating name, type and size.
pub(crate) fn decode_photo(payload: Option<PhotoPayload>) -> Result<Option<PhotoUpload>, Error> {
    let Some(payload) = payload else {
        return Ok(None);
    };
    let file_name = payload
        .file_name
        .ok_or_else(|| missing_field_error("photo.fileName"))?;
    let encoded = payload
        .content_base64
        .ok_or_else(|| missing_field_error("photo.contentBase64"))?;
    let bytes = STANDARD.decode(encoded.trim()).map_err(|_| {
        field_error(
            "photo.contentBase64",
            FieldErrorCode::InvalidBase64,
            "photo content must be valid base64",
        )
    })?;
    PhotoUpload::new(&file_name, bytes)
        .map(Some)
        .map_err(|err| map_photo_validation_error(&err))
}

fn map_photo_validation_error(err: &PhotoValidationError) -> Error {
    let field = match err {
        PhotoValidationError::EmptyContent | PhotoValidationError::TooLarge => {
            "photo.contentBase64"
        }
        PhotoValidationError::EmptyName
        | PhotoValidationError::UnsafeName(_)
        | PhotoValidationError::UnsupportedType => "photo.fileName",
    };
    field_error(field, FieldErrorCode::InvalidPhoto, err.to_string())
}

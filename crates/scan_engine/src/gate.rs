//! Validation applied to analyze responses before anything is trusted.

use serde_json::{Map, Value};

use crate::{AnalysisPayload, ClientError, FailureKind, ProcessedStage};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Transport gate: the response must declare JSON. Guards against redirects
/// to HTML pages (for example an expired-session login page).
pub fn check_content_type(content_type: Option<&str>) -> Result<(), ClientError> {
    let is_json = content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .unwrap_or(ct)
            .trim()
            .eq_ignore_ascii_case(JSON_CONTENT_TYPE)
    });
    if is_json {
        Ok(())
    } else {
        Err(ClientError::new(
            FailureKind::UnexpectedFormat,
            format!("content type {content_type:?}"),
        ))
    }
}

/// Application gate and result parsing for a JSON body.
pub fn parse_analysis_body(status: u16, body: &[u8]) -> Result<AnalysisPayload, ClientError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ClientError::new(FailureKind::UnexpectedFormat, err.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(ClientError::new(
            FailureKind::UnexpectedFormat,
            "body is not a JSON object",
        ));
    };

    let marker = error_marker(fields.get("error"));
    let success = (200..300).contains(&status);
    if !success || marker.is_some() {
        let message = marker.flatten();
        return Err(ClientError::new(
            FailureKind::Server {
                status,
                message: message.clone(),
            },
            message.unwrap_or_else(|| format!("status {status}")),
        ));
    }

    parse_result(&fields)
}

/// Both gates in order, for callers holding the whole response.
pub fn parse_analysis_response(
    status: u16,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<AnalysisPayload, ClientError> {
    check_content_type(content_type)?;
    parse_analysis_body(status, body)
}

/// `Some` when the body carries a failure marker; the inner value is the
/// message when it is usable text. Falsy JSON values do not count.
fn error_marker(value: Option<&Value>) -> Option<Option<String>> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(Some(text.clone())),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        _ => Some(None),
    }
}

fn parse_result(fields: &Map<String, Value>) -> Result<AnalysisPayload, ClientError> {
    let images = fields
        .get("processed_images")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("processed_images missing or not an object"))?;
    let processed_images = images
        .iter()
        .map(|(stage, image)| {
            image
                .as_str()
                .map(|image_ref| ProcessedStage {
                    stage: stage.clone(),
                    image_ref: image_ref.to_string(),
                })
                .ok_or_else(|| malformed(format!("image for stage {stage} is not a string")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let confidence = fields
        .get("confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| malformed("confidence missing or not a number"))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(malformed(format!("confidence {confidence} outside [0, 1]")));
    }

    Ok(AnalysisPayload {
        processed_images,
        cancer_type: string_field(fields, "cancer_type")?,
        cancer_stage: string_field(fields, "cancer_stage")?,
        confidence,
    })
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<String, ClientError> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| malformed(format!("{name} missing or not a string")))
}

fn malformed(message: impl Into<String>) -> ClientError {
    ClientError::new(FailureKind::MalformedResult, message)
}

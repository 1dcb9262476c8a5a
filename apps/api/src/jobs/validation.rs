use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::jobs::models::{JobPayload, JobStatus};

/// A single rejected field, named by its wire (camelCase) name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a payload. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

#[cfg(test)]
impl ValidationErrors {
    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(|e| e.field).collect();
        write!(f, "invalid fields: {}", names.join(", "))
    }
}

/// A payload that passed validation, trimmed and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidJob {
    pub job_title: String,
    pub company_name: String,
    pub application_link: String,
    pub status: JobStatus,
}

/// Validates a create/update payload.
///
/// Fields must be JSON strings and are trimmed before any check. All four
/// fields are required;
/// `applicationLink` must be an absolute URL with a host and `status` must name
/// one of the closed set exactly. Failures are collected for every field in
/// declaration order rather than stopping at the first.
pub fn validate_job_payload(payload: &JobPayload) -> Result<ValidJob, ValidationErrors> {
    let mut errors = Vec::new();

    let job_title = required(&mut errors, "jobTitle", payload.job_title.as_ref());
    let company_name = required(&mut errors, "companyName", payload.company_name.as_ref());

    let application_link = required(
        &mut errors,
        "applicationLink",
        payload.application_link.as_ref(),
    )
    .and_then(|link| match check_url(&link) {
        Ok(()) => Some(link),
        Err(message) => {
            errors.push(FieldError {
                field: "applicationLink",
                message,
            });
            None
        }
    });

    let status = required(&mut errors, "status", payload.status.as_ref()).and_then(|raw| {
        match raw.parse::<JobStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                let allowed: Vec<&str> = JobStatus::ALL.iter().map(|s| s.as_str()).collect();
                errors.push(FieldError {
                    field: "status",
                    message: format!("status must be one of {}", allowed.join(", ")),
                });
                None
            }
        }
    });

    match (job_title, company_name, application_link, status) {
        (Some(job_title), Some(company_name), Some(application_link), Some(status))
            if errors.is_empty() =>
        {
            Ok(ValidJob {
                job_title,
                company_name,
                application_link,
                status,
            })
        }
        _ => Err(ValidationErrors { fields: errors }),
    }
}

fn required(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<&Value>,
) -> Option<String> {
    let message = match value {
        Some(Value::String(v)) if !v.trim().is_empty() => return Some(v.trim().to_string()),
        None | Some(Value::Null) | Some(Value::String(_)) => format!("{field} is required"),
        Some(_) => format!("{field} must be a string"),
    };
    errors.push(FieldError { field, message });
    None
}

fn check_url(link: &str) -> Result<(), String> {
    let url = Url::parse(link).map_err(|e| format!("applicationLink is not a valid URL: {e}"))?;
    if !url.has_host() {
        return Err("applicationLink must include a host".to_string());
    }
    Ok(())
}

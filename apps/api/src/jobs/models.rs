use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Where an application currently stands. The set is closed; anything else is
/// rejected at validation time and never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobStatus {
    Applied,
    Interviewing,
    Rejected,
    Offer,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Rejected,
        JobStatus::Offer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Rejected => "Rejected",
            JobStatus::Offer => "Offer",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

/// Exact, case-sensitive match against the four variant names.
impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A tracked job application as persisted in the store file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub job_title: String,
    pub company_name: String,
    pub application_link: String,
    pub status: JobStatus,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Current time at the precision records are stored with.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Always three fractional digits, e.g. `2024-03-02T08:00:00.000Z`.
fn serialize_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Body of POST /jobs and PUT /jobs/:id.
///
/// Fields are kept as raw JSON so that a missing or wrongly typed field is
/// reported by the validator together with every other problem, instead of
/// failing decoding on the first one. `null` reads as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    #[serde(default)]
    pub job_title: Option<Value>,
    #[serde(default)]
    pub company_name: Option<Value>,
    #[serde(default)]
    pub application_link: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
}

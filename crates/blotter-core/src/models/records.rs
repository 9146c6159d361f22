//! Blotter entity records mirrored between the device and the REST backend.
//!
//! These are plain data-transfer shapes. Field names serialize in camelCase to
//! match the backend's JSON bodies; optional columns default to `None` so older
//! snapshots stay decodable.

use serde::{Deserialize, Serialize};

/// A registered system user (barangay official, desk officer, or admin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    pub role: String,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: i64,
}

/// The root case entity: a filed incident or complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlotterReport {
    pub id: i64,
    pub case_number: String,
    pub incident_type: String,
    pub incident_date: String,
    #[serde(default)]
    pub incident_time: Option<String>,
    pub incident_location: String,
    pub narrative: String,
    pub complainant_name: String,
    #[serde(default)]
    pub complainant_contact: Option<String>,
    #[serde(default)]
    pub complainant_address: Option<String>,
    pub status: String,
    #[serde(default)]
    pub reported_by_id: Option<i64>,
    #[serde(default)]
    pub assigned_officer_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The person a report is filed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Respondent {
    pub id: i64,
    pub report_id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub accusation: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suspect {
    pub id: i64,
    pub report_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    pub id: i64,
    pub report_id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub statement: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub id: i64,
    pub report_id: i64,
    pub evidence_type: String,
    pub description: String,
    #[serde(default)]
    pub location_found: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub collected_by: Option<String>,
    pub created_at: i64,
}

/// A scheduled mediation or conciliation hearing for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hearing {
    pub id: i64,
    pub report_id: i64,
    pub hearing_date: String,
    pub hearing_time: String,
    pub location: String,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub presiding_officer: Option<String>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub id: i64,
    pub report_id: i64,
    pub resolution_type: String,
    pub details: String,
    pub resolved_date: String,
    #[serde(default)]
    pub resolved_by: Option<String>,
    pub created_at: i64,
}

/// One entry in a person's case history across reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonHistory {
    pub id: i64,
    pub person_id: i64,
    #[serde(default)]
    pub report_id: Option<i64>,
    pub activity_type: String,
    pub description: String,
    pub timestamp: i64,
}

use serde::{Deserialize, Serialize};

/// One persisted questionnaire submission. Field names match the column
/// names so rows serialize the way they are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: i64,
    pub first_name: String,
    pub email: String,
    pub question_1: Option<String>,
    pub question_2: Option<String>,
    pub question_3: Option<String>,
    pub question_4: Option<String>,
    pub question_5: Option<String>,
    /// Assigned by the store at insertion time (UTC), immutable afterwards.
    pub submitted_at: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A validated submission ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub first_name: String,
    pub email: String,
    pub question_1: Option<String>,
    pub question_2: Option<String>,
    pub question_3: Option<String>,
    pub question_4: Option<String>,
    pub question_5: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Wire shape of POST /api/submit-questionnaire. Required fields are
/// `Option` so missing values surface as a validation error with a
/// descriptive message instead of a deserialization failure.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub question_1: Option<String>,
    pub question_2: Option<String>,
    pub question_3: Option<String>,
    pub question_4: Option<String>,
    pub question_5: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub response_id: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseListResponse {
    pub success: bool,
    pub count: usize,
    pub responses: Vec<Response>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SingleResponse {
    pub success: bool,
    pub response: Response,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<Response>,
}

/// Submissions on one calendar day.
#[derive(Debug, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStats {
    pub total: i64,
    pub today: i64,
    pub unique_emails: i64,
    /// Per-day counts for the most recent 30 days, extended mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<Vec<DailyCount>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: ResponseStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsQuery {
    pub extended: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<EndpointInfo>,
}

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of a request submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestBody {
    #[validate(length(min = 1))]
    pub request_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub people_affected: i32,
    /// Declared urgency label; defaults to medium when omitted
    #[serde(default)]
    pub urgency: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Authenticated requester id; absent for anonymous submissions
    #[serde(default)]
    pub requester_id: Option<i64>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

/// Body of an approval decision
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequestBody {
    pub approved: bool,
    /// Identity of the already-authorized approver
    #[validate(range(min = 1))]
    pub approver_id: i64,
    /// Required when rejecting
    #[serde(default)]
    pub reason: Option<String>,
}

//! `SoftLayer_Scale_Policy`

use crate::error::{ClientError, Result};
use crate::services::{call, call_expecting_true, parameters};
use serde::{Deserialize, Serialize};
use softlayer_core::{ApiRequest, Transport};

const SERVICE: &str = "SoftLayer_Scale_Policy";

pub struct ScalePolicyService<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> ScalePolicyService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn name(&self) -> &'static str {
        SERVICE
    }

    /// Create a policy. Templates missing required values are rejected
    /// without contacting the API.
    pub async fn create_object(&self, template: &ScalePolicy) -> Result<ScalePolicy> {
        validate(template)?;

        call(
            self.transport,
            ApiRequest::post(
                format!("{}.json", SERVICE),
                parameters(std::slice::from_ref(template))?,
            ),
        )
        .await
    }

    pub async fn delete_object(&self, id: i64) -> Result<()> {
        call_expecting_true(
            self.transport,
            ApiRequest::get(format!("{}/{}/deleteObject", SERVICE, id)),
            &format!("Delete of scale policy {}", id),
        )
        .await
    }
}

/// Check a creation template, reporting every missing value at once
pub fn validate(template: &ScalePolicy) -> Result<()> {
    let mut missing = Vec::new();

    if template.name.as_deref().unwrap_or_default().is_empty() {
        missing.push("Name for the scale policy");
    }
    if template.scale_group_id.unwrap_or_default() == 0 {
        missing.push("ScaleGroupId for the scale policy");
    }
    if template.scale_actions.is_empty() {
        missing.push("ScaleActions: scaleActions for the scale policy");
    }
    for action in &template.scale_actions {
        if action.type_id.unwrap_or_default() == 0 {
            missing.push("ScaleAction.TypeId: TypeId for the scale action");
        }
        if action.amount.unwrap_or_default() == 0 {
            missing.push("ScaleAction.Amount: Amount for the scale action");
        }
        if action.scale_type.as_deref().unwrap_or_default().is_empty() {
            missing.push("ScaleAction.ScaleType: ScaleType for the scale action");
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    Err(ClientError::InvalidTemplate(
        missing
            .iter()
            .map(|field| format!("* {} is required and cannot be empty\n", field))
            .collect(),
    ))
}

// ============ API Types ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scale_actions: Vec<ScaleAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<ScaleTrigger>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// `RELATIVE`, `ABSOLUTE` or `PERCENT`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<i64>,
    /// Cron-like schedule of a repeating trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    /// Fire date of a one-time trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<chrono::DateTime<chrono::FixedOffset>>,
}

//! `SoftLayer_Scale_Group`

use crate::error::{ClientError, Result};
use crate::services::scale_policy::ScalePolicy;
use crate::services::{call, call_expecting_true, parameters};
use serde::{Deserialize, Serialize};
use softlayer_core::{ApiRequest, ObjectMask, ResourceKind, Transport, resolve_id};

const SERVICE: &str = "SoftLayer_Scale_Group";

const OBJECT_MASK: [&str; 18] = [
    "id",
    "name",
    "minimumMemberCount",
    "maximumMemberCount",
    "cooldown",
    "regionalGroup.id",
    "regionalGroup.name",
    "terminationPolicy.name",
    "virtualGuestMemberTemplate",
    "loadBalancers.id",
    "loadBalancers.port",
    "loadBalancers.virtualServerId",
    "loadBalancers.healthCheck.id",
    "loadBalancers.healthCheck.healthCheckTypeId",
    "loadBalancers.healthCheck.name",
    "loadBalancers.healthCheck.attributes.value",
    "loadBalancers.healthCheck.attributes.type.id",
    "loadBalancers.healthCheck.attributes.type.keyname",
];

pub struct ScaleGroupService<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> ScaleGroupService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn name(&self) -> &'static str {
        SERVICE
    }

    /// Create a scale group.
    ///
    /// A regional group given by name is replaced with its `regionalGroupId`,
    /// and health checks given by name get their `healthCheckTypeId`.
    pub async fn create_object(&self, mut template: ScaleGroup) -> Result<ScaleGroup> {
        if let Some(name) = template
            .regional_group
            .as_ref()
            .and_then(|g| g.name.clone())
            .filter(|n| !n.is_empty())
        {
            let id = self
                .lookup(&ResourceKind::LOCATION_GROUP_REGIONAL, "regionalGroupId", &name)
                .await?;
            template.regional_group_id = Some(id);
            template.regional_group = None;
        }

        for lb in &mut template.load_balancers {
            let Some(health_check) = lb.health_check.as_mut() else {
                continue;
            };
            if let Some(name) = health_check.name.take().filter(|n| !n.is_empty()) {
                let id = self
                    .lookup(&ResourceKind::HEALTH_CHECK_TYPE, "healthCheckId", &name)
                    .await?;
                health_check.health_check_type_id = Some(id);
            }
        }

        let body = parameters(std::slice::from_ref(&template))?;
        tracing::debug!("{}#createObject body: {}", SERVICE, body);

        let group: ScaleGroup = call(
            self.transport,
            ApiRequest::post(format!("{}/createObject", SERVICE), body),
        )
        .await?;
        tracing::info!("Created scale group {:?}", group.id);
        Ok(group)
    }

    pub async fn get_object(&self, id: i64) -> Result<ScaleGroup> {
        call(
            self.transport,
            ApiRequest::get(format!("{}/{}/getObject.json", SERVICE, id))
                .with_mask(ObjectMask::new(OBJECT_MASK)),
        )
        .await
    }

    /// Delete the group together with its members
    pub async fn force_delete_object(&self, id: i64) -> Result<()> {
        call_expecting_true(
            self.transport,
            ApiRequest::get(format!("{}/{}/forceDeleteObject", SERVICE, id)),
            &format!("Force delete of scale group {}", id),
        )
        .await
    }

    async fn lookup(&self, kind: &ResourceKind, field: &'static str, name: &str) -> Result<i64> {
        resolve_id(self.transport, kind, name)
            .await
            .map_err(|source| ClientError::Lookup {
                field,
                name: name.to_string(),
                source,
            })
    }
}

// ============ API Types ============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_member_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_member_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regional_group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regional_group: Option<RegionalGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_policy_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancers: Vec<ScaleLoadBalancer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<ScalePolicy>,
    /// Passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_guest_member_template: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLoadBalancer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_server_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<HealthCheckAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<HealthCheckAttributeType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckAttributeType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyname: Option<String>,
}

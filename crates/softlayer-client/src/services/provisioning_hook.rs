//! `SoftLayer_Provisioning_Hook`

use crate::error::Result;
use crate::services::{call, call_expecting_true, parameters};
use serde::{Deserialize, Serialize};
use softlayer_core::{
    ApiRequest, Clock, PollConfig, PollOutcome, Poller, SoftLayerError, Transport, decode, fetch,
};

const SERVICE: &str = "SoftLayer_Provisioning_Hook";

pub struct ProvisioningHookService<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> ProvisioningHookService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn name(&self) -> &'static str {
        SERVICE
    }

    pub async fn create_object(&self, template: &ProvisioningHookTemplate) -> Result<ProvisioningHook> {
        let hook: ProvisioningHook = call(
            self.transport,
            ApiRequest::post(
                format!("{}.json", SERVICE),
                parameters(std::slice::from_ref(template))?,
            ),
        )
        .await?;
        tracing::info!("Created provisioning hook {}", hook.id);
        Ok(hook)
    }

    pub async fn get_object(&self, id: i64) -> Result<ProvisioningHook> {
        call(
            self.transport,
            ApiRequest::get(format!("{}/{}/getObject.json", SERVICE, id)),
        )
        .await
    }

    pub async fn edit_object(&self, id: i64, template: &ProvisioningHookTemplate) -> Result<()> {
        call_expecting_true(
            self.transport,
            ApiRequest::new(softlayer_core::Method::Put, format!("{}/{}.json", SERVICE, id))
                .with_body(parameters(std::slice::from_ref(template))?),
            &format!("Edit of provisioning hook {}", id),
        )
        .await
    }

    pub async fn delete_object(&self, id: i64) -> Result<()> {
        call_expecting_true(
            self.transport,
            ApiRequest::delete(format!("{}/{}.json", SERVICE, id)),
            &format!("Delete of provisioning hook {}", id),
        )
        .await
    }

    /// Wait until hook `id` can be read back
    pub async fn wait_until_present(&self, id: i64, config: &PollConfig) -> Result<ProvisioningHook> {
        self.wait_until_present_with(id, &Poller::new(*config)).await
    }

    /// A 404 means not yet visible; any other failure ends the wait.
    pub async fn wait_until_present_with<C: Clock>(
        &self,
        id: i64,
        poller: &Poller<C>,
    ) -> Result<ProvisioningHook> {
        let transport = self.transport;
        let path = &format!("{}/{}/getObject.json", SERVICE, id);

        let hook = poller
            .run(move || async move {
                match fetch(transport, ApiRequest::get(path.as_str())).await {
                    Ok(body) => match decode::<ProvisioningHook>(&body, SERVICE) {
                        Ok(hook) => PollOutcome::Complete(hook),
                        Err(e) => PollOutcome::Error(e),
                    },
                    Err(SoftLayerError::RemoteRequestFailed { status: 404, .. }) => {
                        PollOutcome::Pending
                    }
                    Err(e) => PollOutcome::Error(e),
                }
            })
            .await?;
        Ok(hook)
    }
}

// ============ API Types ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningHook {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub type_id: Option<i64>,
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub create_date: Option<chrono::DateTime<chrono::FixedOffset>>,
    #[serde(default)]
    pub modify_date: Option<chrono::DateTime<chrono::FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningHookTemplate {
    pub name: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<i64>,
}

//! `SoftLayer_Location_Datacenter`

use crate::error::Result;
use crate::services::call;
use serde::{Deserialize, Serialize};
use softlayer_core::{ApiRequest, ObjectFilter, ObjectMask, Transport};

const SERVICE: &str = "SoftLayer_Location_Datacenter";

pub struct DatacenterService<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> DatacenterService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn name(&self) -> &'static str {
        SERVICE
    }

    /// List datacenters, optionally masked and filtered
    pub async fn get_datacenters(
        &self,
        mask: Option<ObjectMask>,
        filter: Option<ObjectFilter>,
    ) -> Result<Vec<Location>> {
        let mut request = ApiRequest::get(format!("{}/getDatacenters.json", SERVICE));
        if let Some(mask) = mask {
            request = request.with_mask(mask);
        }
        if let Some(filter) = filter {
            request = request.with_filter(filter);
        }
        call(self.transport, request).await
    }
}

/// A SoftLayer location (datacenter)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
}

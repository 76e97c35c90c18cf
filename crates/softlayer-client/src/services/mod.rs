//! Per-resource SoftLayer services
//!
//! Every service borrows a [`Transport`] and speaks to one SoftLayer service
//! name. Create and edit calls wrap their payload in the `{"parameters": [...]}`
//! envelope the REST endpoint expects.

pub mod datacenter;
pub mod dns_record;
pub mod load_balancer;
pub mod product;
pub mod provisioning_hook;
pub mod scale_group;
pub mod scale_policy;

pub use datacenter::{DatacenterService, Location};
pub use dns_record::{DnsRecord, DnsRecordService, DnsRecordTemplate};
pub use load_balancer::{
    IpAddress, LoadBalancer, LoadBalancerCreateOptions, LoadBalancerHardware,
    LoadBalancerService,
};
pub use product::{
    ItemPrice, LoadBalancerOrder, OrderReceipt, PriceCategory, ProductItem, ProductPackage,
    ProductService,
};
pub use provisioning_hook::{ProvisioningHook, ProvisioningHookService, ProvisioningHookTemplate};
pub use scale_group::{
    HealthCheck, HealthCheckAttribute, HealthCheckAttributeType, RegionalGroup, ScaleGroup,
    ScaleGroupService, ScaleLoadBalancer,
};
pub use scale_policy::{ScaleAction, ScalePolicy, ScalePolicyService, ScaleTrigger};

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use softlayer_core::{
    ApiRequest, SoftLayerError, Transport, check_api_error, decode, expect_true, fetch,
    is_http_error_code,
};

/// `{"parameters": [item, ...]}`
pub(crate) fn parameters<T: Serialize>(items: &[T]) -> Result<Value> {
    Ok(json!({ "parameters": serde_json::to_value(items)? }))
}

/// Send `request`, surface HTTP and API errors, decode the body
pub(crate) async fn call<T, R>(transport: &T, request: ApiRequest) -> Result<R>
where
    T: Transport + ?Sized,
    R: DeserializeOwned,
{
    let resource = request.resource().to_string();
    let body = fetch(transport, request).await?;
    check_api_error(&body)?;
    Ok(decode(&body, &resource)?)
}

/// Send `request` and require the `true` sentinel and a 2xx status.
///
/// The sentinel is checked first, so a failing call reports what the API
/// actually answered. A non-2xx status fails even when the body is `true`.
pub(crate) async fn call_expecting_true<T>(
    transport: &T,
    request: ApiRequest,
    operation: &str,
) -> Result<()>
where
    T: Transport + ?Sized,
{
    let resource = request.resource().to_string();
    let response = transport.send(request).await?;
    expect_true(&response.body, operation)?;

    if is_http_error_code(response.status) {
        tracing::debug!("{} answered HTTP {} with body true", resource, response.status);
        return Err(SoftLayerError::RemoteRequestFailed {
            status: response.status,
            resource,
        }
        .into());
    }
    Ok(())
}

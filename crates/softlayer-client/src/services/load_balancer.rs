//! Application delivery controller load balancers
//!
//! Ordering a load balancer is asynchronous: the order call returns a receipt
//! and the balancer shows up on the account some minutes later. Creation
//! therefore ends with a [`Poller`] watching the account for the balancer
//! tied to the order.

use crate::error::{ClientError, Result};
use crate::services::product::{ItemPrice, LoadBalancerOrder, ProductService};
use crate::services::call;
use serde::{Deserialize, Serialize};
use softlayer_core::{
    ApiRequest, Clock, ObjectFilter, PollConfig, PollOutcome, Poller, ResourceKind, Transport,
    classify_single, decode, fetch, resolve_id,
};

const SERVICE: &str = "SoftLayer_Network_Application_Delivery_Controller_LoadBalancer_VirtualIpAddress";
const ACCOUNT_LOAD_BALANCERS: &str = "SoftLayer_Account/getAdcLoadBalancers.json";

pub const PACKAGE_TYPE: &str = "ADDITIONAL_SERVICES_LOAD_BALANCER";
pub const ORDER_TYPE: &str = "SoftLayer_Container_Product_Order_Network_LoadBalancer";
pub const PACKAGE_ID: i64 = 194;

const ORDER_ID_PATH: [&str; 5] = [
    "adcLoadBalancers",
    "dedicatedBillingItem",
    "orderItem",
    "order",
    "id",
];

/// What to order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerCreateOptions {
    /// Connection limit, one of the sizes SoftLayer sells (e.g. 250, 1000)
    pub connections: u32,
    /// Datacenter name, e.g. `ams01`
    pub location: String,
}

pub struct LoadBalancerService<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> LoadBalancerService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn name(&self) -> &'static str {
        SERVICE
    }

    pub async fn get_object(&self, id: i64) -> Result<LoadBalancer> {
        call(
            self.transport,
            ApiRequest::get(format!("{}/{}/getObject.json", SERVICE, id)),
        )
        .await
    }

    /// The price matching `options.connections`
    pub async fn find_create_price_items(
        &self,
        options: &LoadBalancerCreateOptions,
    ) -> Result<Vec<ItemPrice>> {
        let items = ProductService::new(self.transport)
            .get_items_by_type(PACKAGE_TYPE)
            .await?;
        let key = price_item_key(options.connections);

        items
            .into_iter()
            .filter(|item| item.key_name == key)
            .find_map(|item| item.prices.into_iter().next())
            .map(|price| vec![price])
            .ok_or_else(|| {
                ClientError::InvalidOptions("LB Connections field has an incorrect value".to_string())
            })
    }

    /// Order a load balancer and wait until it is provisioned
    pub async fn create_load_balancer(
        &self,
        options: &LoadBalancerCreateOptions,
        config: &PollConfig,
    ) -> Result<LoadBalancer> {
        self.create_load_balancer_with(options, &Poller::new(*config))
            .await
    }

    pub async fn create_load_balancer_with<C: Clock>(
        &self,
        options: &LoadBalancerCreateOptions,
        poller: &Poller<C>,
    ) -> Result<LoadBalancer> {
        let prices = self.find_create_price_items(options).await?;

        let location_id = resolve_id(self.transport, &ResourceKind::DATACENTER, &options.location)
            .await
            .map_err(|source| ClientError::Lookup {
                field: "location",
                name: options.location.clone(),
                source,
            })?;

        let order = LoadBalancerOrder {
            package_id: PACKAGE_ID,
            complex_type: ORDER_TYPE.to_string(),
            location: location_id.to_string(),
            prices,
            quantity: 1,
        };

        let receipt = ProductService::new(self.transport)
            .place_load_balancer_order(&order)
            .await?;

        self.wait_for_order(receipt.order_id, poller).await
    }

    /// Wait for the load balancer created by `order_id`
    pub async fn find_load_balancer_by_order_id(
        &self,
        order_id: i64,
        config: &PollConfig,
    ) -> Result<LoadBalancer> {
        self.wait_for_order(order_id, &Poller::new(*config)).await
    }

    pub async fn wait_for_order<C: Clock>(
        &self,
        order_id: i64,
        poller: &Poller<C>,
    ) -> Result<LoadBalancer> {
        let filter = &order_filter(order_id);
        let transport = self.transport;

        tracing::info!("Waiting for load balancer of order {}", order_id);
        let lb = poller
            .run(move || async move {
                let request = ApiRequest::get(ACCOUNT_LOAD_BALANCERS).with_filter(filter.clone());
                let found = match fetch(transport, request).await {
                    Ok(body) => decode::<Vec<LoadBalancer>>(&body, "SoftLayer_Account"),
                    Err(e) => Err(e),
                };
                match found {
                    Ok(lbs) => classify_single(lbs, "load balancer"),
                    Err(e) => PollOutcome::Error(e),
                }
            })
            .await?;

        tracing::info!("Load balancer {} is ready", lb.id);
        Ok(lb)
    }
}

/// `DEDICATED_LOAD_BALANCER_WITH_HIGH_AVAILABILITY_AND_SSL_<n>_CONNECTIONS`
pub fn price_item_key(connections: u32) -> String {
    format!(
        "DEDICATED_LOAD_BALANCER_WITH_HIGH_AVAILABILITY_AND_SSL_{}_CONNECTIONS",
        connections
    )
}

/// Account filter selecting the balancer billed under `order_id`
pub fn order_filter(order_id: i64) -> ObjectFilter {
    ObjectFilter::nested(&ORDER_ID_PATH, order_id)
}

// ============ API Types ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_certificate_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancer_hardware: Vec<LoadBalancerHardware>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAddress {
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerHardware {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

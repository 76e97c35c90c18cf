//! `SoftLayer_Product_Package` and `SoftLayer_Product_Order`

use crate::error::{ClientError, Result};
use crate::services::{call, parameters};
use serde::{Deserialize, Serialize};
use softlayer_core::{ApiRequest, ObjectFilter, ObjectMask, Transport};

const PACKAGE_SERVICE: &str = "SoftLayer_Product_Package";
const ORDER_SERVICE: &str = "SoftLayer_Product_Order";

pub struct ProductService<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> ProductService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Packages whose type key name is `package_type`
    pub async fn get_packages_by_type(&self, package_type: &str) -> Result<Vec<ProductPackage>> {
        let request = ApiRequest::get(format!("{}/getAllObjects.json", PACKAGE_SERVICE))
            .with_mask(ObjectMask::new([
                "id",
                "name",
                "description",
                "isActive",
                "type.keyName",
            ]))
            .with_filter(ObjectFilter::nested(&["type", "keyName"], package_type));
        call(self.transport, request).await
    }

    /// Items of a single package, prices included
    pub async fn get_items(&self, package_id: i64) -> Result<Vec<ProductItem>> {
        let request = ApiRequest::get(format!("{}/{}/getItems.json", PACKAGE_SERVICE, package_id))
            .with_mask(ObjectMask::new([
                "id",
                "capacity",
                "description",
                "units",
                "keyName",
                "prices.id",
                "prices.categories.id",
                "prices.categories.name",
            ]));
        call(self.transport, request).await
    }

    /// Items of the first active package of `package_type`
    pub async fn get_items_by_type(&self, package_type: &str) -> Result<Vec<ProductItem>> {
        let package = self
            .get_packages_by_type(package_type)
            .await?
            .into_iter()
            .find(|p| p.is_active != Some(0))
            .ok_or_else(|| {
                ClientError::InvalidOptions(format!("No active package of type {}", package_type))
            })?;

        tracing::debug!("Using package {} for type {}", package.id, package_type);
        self.get_items(package.id).await
    }

    /// Place a load balancer order
    pub async fn place_load_balancer_order(&self, order: &LoadBalancerOrder) -> Result<OrderReceipt> {
        let request = ApiRequest::post(
            format!("{}/placeOrder.json", ORDER_SERVICE),
            parameters(std::slice::from_ref(order))?,
        );
        let receipt: OrderReceipt = call(self.transport, request).await?;
        tracing::info!("Placed order {}", receipt.order_id);
        Ok(receipt)
    }
}

// ============ API Types ============

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPackage {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItem {
    pub id: i64,
    #[serde(default)]
    pub key_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub prices: Vec<ItemPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPrice {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<PriceCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCategory {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `SoftLayer_Container_Product_Order_Network_LoadBalancer`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerOrder {
    pub package_id: i64,
    pub complex_type: String,
    pub location: String,
    pub prices: Vec<ItemPrice>,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: i64,
    #[serde(default)]
    pub order_date: Option<chrono::DateTime<chrono::FixedOffset>>,
}

//! DNS domain resource records

use crate::error::Result;
use crate::services::{call, call_expecting_true, parameters};
use serde::{Deserialize, Serialize};
use softlayer_core::{ApiRequest, ObjectMask, Transport};

const SERVICE: &str = "SoftLayer_Dns_Domain_ResourceRecord";
const SRV_SERVICE: &str = "SoftLayer_Dns_Domain_ResourceRecord_SrvType";

const OBJECT_MASK: [&str; 17] = [
    "data",
    "domainId",
    "expire",
    "host",
    "id",
    "minimum",
    "mxPriority",
    "refresh",
    "responsiblePerson",
    "retry",
    "ttl",
    "type",
    "service",
    "priority",
    "protocol",
    "port",
    "weight",
];

/// Service handling records of `record_type`. Only SRV records carry extra
/// fields, everything else goes through the base service.
pub fn service_for_type(record_type: &str) -> &'static str {
    match record_type {
        "srv" => SRV_SERVICE,
        _ => SERVICE,
    }
}

pub struct DnsRecordService<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> DnsRecordService<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn name(&self) -> &'static str {
        SERVICE
    }

    pub async fn create_object(&self, template: &DnsRecordTemplate) -> Result<DnsRecord> {
        let service = service_for_type(&template.record_type);
        call(
            self.transport,
            ApiRequest::post(
                format!("{}/createObject", service),
                parameters(std::slice::from_ref(template))?,
            ),
        )
        .await
    }

    /// Create several records in one call
    pub async fn create_objects(&self, templates: &[DnsRecordTemplate]) -> Result<Vec<DnsRecord>> {
        call(
            self.transport,
            ApiRequest::post(format!("{}/createObject", SERVICE), parameters(templates)?),
        )
        .await
    }

    pub async fn get_object(&self, id: i64) -> Result<DnsRecord> {
        call(
            self.transport,
            ApiRequest::get(format!("{}/{}/getObject.json", SERVICE, id))
                .with_mask(ObjectMask::new(OBJECT_MASK)),
        )
        .await
    }

    pub async fn edit_object(&self, id: i64, record: &DnsRecord) -> Result<()> {
        let service = service_for_type(&record.record_type);
        call_expecting_true(
            self.transport,
            ApiRequest::post(
                format!("{}/{}/editObject.json", service, id),
                parameters(std::slice::from_ref(record))?,
            ),
            &format!("Edit of DNS domain record {}", id),
        )
        .await
    }

    pub async fn delete_object(&self, id: i64) -> Result<()> {
        call_expecting_true(
            self.transport,
            ApiRequest::delete(format!("{}/{}.json", SERVICE, id)),
            &format!("Delete of DNS domain record {}", id),
        )
        .await
    }
}

// ============ API Types ============

/// Record as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mx_priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

/// Record creation template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordTemplate {
    pub domain_id: i64,
    pub host: String,
    pub data: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mx_priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_for_type() {
        assert_eq!(service_for_type("srv"), "SoftLayer_Dns_Domain_ResourceRecord_SrvType");
        assert_eq!(service_for_type("a"), "SoftLayer_Dns_Domain_ResourceRecord");
        assert_eq!(service_for_type("mx"), "SoftLayer_Dns_Domain_ResourceRecord");
    }

    #[test]
    fn test_template_uses_type_key() {
        let template = DnsRecordTemplate {
            domain_id: 1,
            host: "www".to_string(),
            data: "10.0.0.1".to_string(),
            record_type: "a".to_string(),
            ttl: 900,
            ..Default::default()
        };
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["type"], "a");
        assert_eq!(value["domainId"], 1);
        assert!(value.get("port").is_none());
    }
}

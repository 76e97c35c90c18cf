mod common;

use common::{FakeSoftLayer, fixtures};
use softlayer_client::{
    ClientError, DnsRecord, DnsRecordService, DnsRecordTemplate, HealthCheck,
    ProvisioningHookService, ProvisioningHookTemplate, RegionalGroup, ScaleGroup,
    ScaleGroupService, ScaleLoadBalancer, ScalePolicy, ScalePolicyService,
};
use softlayer_core::{ManualClock, Method, PollConfig, Poller, SoftLayerError};
use std::sync::Arc;
use std::time::Duration;

const REGIONAL_GROUPS: &str = "SoftLayer_Location_Group_Regional/getAllObjects.json";
const HEALTH_CHECK_TYPES: &str =
    "SoftLayer_Network_Application_Delivery_Controller_LoadBalancer_Health_Check_Type/getAllObjects.json";

// ============ Scale groups ============

fn scale_group_template() -> ScaleGroup {
    ScaleGroup {
        name: Some("web".to_string()),
        cooldown: Some(30),
        minimum_member_count: Some(1),
        maximum_member_count: Some(10),
        regional_group: Some(RegionalGroup {
            id: None,
            name: Some("na-usa-west-1".to_string()),
        }),
        load_balancers: vec![ScaleLoadBalancer {
            port: Some(80),
            virtual_server_id: Some(5),
            health_check: Some(HealthCheck {
                name: Some("DNS".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_scale_group_create_resolves_names() {
    let api = FakeSoftLayer::new();
    api.on(REGIONAL_GROUPS, r#"[{"id":62,"name":"na-usa-west-1"}]"#)
        .on(HEALTH_CHECK_TYPES, r#"[{"id":3,"keyname":"DNS"}]"#)
        .on("SoftLayer_Scale_Group/createObject", r#"{"id":7,"name":"web"}"#);

    let group = ScaleGroupService::new(&api)
        .create_object(scale_group_template())
        .await
        .unwrap();
    assert_eq!(group.id, Some(7));

    let request = api.last_to("SoftLayer_Scale_Group/createObject").unwrap();
    assert_eq!(request.method, Method::Post);
    let sent = &request.body.unwrap()["parameters"][0];
    assert_eq!(sent["regionalGroupId"], 62);
    assert!(sent.get("regionalGroup").is_none());
    let health_check = &sent["loadBalancers"][0]["healthCheck"];
    assert_eq!(health_check["healthCheckTypeId"], 3);
    assert!(health_check.get("name").is_none());
}

#[tokio::test]
async fn test_scale_group_unknown_region_is_not_sent() {
    let api = FakeSoftLayer::new();
    api.on(REGIONAL_GROUPS, "[]");

    let err = ScaleGroupService::new(&api)
        .create_object(scale_group_template())
        .await
        .unwrap_err();

    assert!(
        err.to_string()
            .starts_with("Error while looking up regionalGroupId from name [na-usa-west-1]")
    );
    assert_eq!(api.count("SoftLayer_Scale_Group/createObject"), 0);
}

#[tokio::test]
async fn test_scale_group_api_error_in_body() {
    let api = FakeSoftLayer::new();
    api.on(
        "SoftLayer_Scale_Group/createObject",
        r#"{"error":"Name is already taken","code":"SoftLayer_Exception_Public"}"#,
    );

    let err = ScaleGroupService::new(&api)
        .create_object(ScaleGroup {
            name: Some("web".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        ClientError::SoftLayer(SoftLayerError::Api { code, message }) => {
            assert_eq!(code.as_deref(), Some("SoftLayer_Exception_Public"));
            assert_eq!(message, "Name is already taken");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scale_group_get_object_uses_mask() {
    let api = FakeSoftLayer::new();
    api.on(
        "SoftLayer_Scale_Group/7/getObject.json",
        r#"{"id":7,"name":"web","regionalGroup":{"id":62,"name":"na-usa-west-1"}}"#,
    );

    let group = ScaleGroupService::new(&api).get_object(7).await.unwrap();
    assert_eq!(group.regional_group.unwrap().name.as_deref(), Some("na-usa-west-1"));

    let mask = api.requests()[0].mask.clone().unwrap();
    assert!(mask.contains("loadBalancers.healthCheck.attributes.type.keyname"));
    assert!(mask.contains("terminationPolicy.name"));
}

#[tokio::test]
async fn test_scale_group_force_delete() {
    let api = FakeSoftLayer::new();
    api.on("SoftLayer_Scale_Group/7/forceDeleteObject", "true")
        .on("SoftLayer_Scale_Group/8/forceDeleteObject", "false");

    let service = ScaleGroupService::new(&api);
    service.force_delete_object(7).await.unwrap();

    let err = service.force_delete_object(8).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Force delete of scale group 8 failed, got 'false' as response from the API"
    );
}

#[tokio::test]
async fn test_scale_group_force_delete_true_body_with_server_error() {
    let api = FakeSoftLayer::new();
    api.on_status("SoftLayer_Scale_Group/9/forceDeleteObject", 503, "true");

    let err = ScaleGroupService::new(&api)
        .force_delete_object(9)
        .await
        .unwrap_err();
    match err {
        ClientError::SoftLayer(SoftLayerError::RemoteRequestFailed { status, resource }) => {
            assert_eq!(status, 503);
            assert_eq!(resource, "SoftLayer_Scale_Group");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============ Scale policies ============

#[tokio::test]
async fn test_scale_policy_invalid_template_sends_nothing() {
    let api = FakeSoftLayer::new();

    let err = ScalePolicyService::new(&api)
        .create_object(&ScalePolicy::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidTemplate(_)));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_scale_policy_delete_requires_true() {
    let api = FakeSoftLayer::new();
    api.on_status(
        "SoftLayer_Scale_Policy/3/deleteObject",
        500,
        r#"{"error":"Internal","code":"SoftLayer_Exception"}"#,
    );

    let err = ScalePolicyService::new(&api).delete_object(3).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::SoftLayer(SoftLayerError::UnexpectedResponse { .. })
    ));
}

// ============ DNS records ============

#[tokio::test]
async fn test_dns_srv_record_goes_to_srv_service() {
    let api = FakeSoftLayer::new();
    api.on(
        "SoftLayer_Dns_Domain_ResourceRecord_SrvType/createObject",
        r#"{"id":11,"type":"srv","host":"_sip._tcp","service":"_sip","port":5060}"#,
    );

    let record = DnsRecordService::new(&api)
        .create_object(&DnsRecordTemplate {
            domain_id: 1,
            host: "_sip._tcp".to_string(),
            data: "sip.example.com".to_string(),
            record_type: "srv".to_string(),
            ttl: 900,
            service: Some("_sip".to_string()),
            protocol: Some("_tcp".to_string()),
            port: Some(5060),
            priority: Some(10),
            weight: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(record.id, Some(11));
    assert_eq!(record.port, Some(5060));
}

#[tokio::test]
async fn test_dns_create_objects() {
    let api = FakeSoftLayer::new();
    api.on(
        "SoftLayer_Dns_Domain_ResourceRecord/createObject",
        r#"[{"id":1,"type":"a"},{"id":2,"type":"a"}]"#,
    );

    let template = DnsRecordTemplate {
        domain_id: 1,
        host: "www".to_string(),
        data: "10.0.0.1".to_string(),
        record_type: "a".to_string(),
        ttl: 900,
        ..Default::default()
    };
    let records = DnsRecordService::new(&api)
        .create_objects(&[template.clone(), template])
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    let body = api.requests()[0].body.clone().unwrap();
    assert_eq!(body["parameters"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_dns_edit_and_delete_require_true() {
    let api = FakeSoftLayer::new();
    api.on("SoftLayer_Dns_Domain_ResourceRecord/5/editObject.json", "true")
        .on("SoftLayer_Dns_Domain_ResourceRecord/5.json", "true")
        .on("SoftLayer_Dns_Domain_ResourceRecord/6.json", "false");

    let service = DnsRecordService::new(&api);
    let record = DnsRecord {
        record_type: "a".to_string(),
        data: Some("10.0.0.2".to_string()),
        ..Default::default()
    };

    service.edit_object(5, &record).await.unwrap();
    service.delete_object(5).await.unwrap();

    let err = service.delete_object(6).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Delete of DNS domain record 6 failed, got 'false' as response from the API"
    );
    assert_eq!(api.requests()[1].method, Method::Delete);
}

#[tokio::test]
async fn test_dns_delete_true_body_with_server_error() {
    let api = FakeSoftLayer::new();
    api.on_status("SoftLayer_Dns_Domain_ResourceRecord/9.json", 500, "true");

    let err = DnsRecordService::new(&api).delete_object(9).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::SoftLayer(SoftLayerError::RemoteRequestFailed { status: 500, .. })
    ));
    assert_eq!(
        err.to_string(),
        "Could not retrieve SoftLayer_Dns_Domain_ResourceRecord, HTTP error code: '500'"
    );
}

#[tokio::test]
async fn test_dns_get_object() {
    let api = FakeSoftLayer::new();
    api.on(
        "SoftLayer_Dns_Domain_ResourceRecord/5/getObject.json",
        r#"{"id":5,"domainId":1,"host":"www","data":"10.0.0.1","type":"a","ttl":900}"#,
    );

    let record = DnsRecordService::new(&api).get_object(5).await.unwrap();
    assert_eq!(record.host.as_deref(), Some("www"));
    assert_eq!(record.ttl, Some(900));
    assert_eq!(api.requests()[0].mask.as_ref().unwrap().fields().len(), 17);
}

// ============ Provisioning hooks ============

#[tokio::test]
async fn test_provisioning_hook_lifecycle() {
    let api = FakeSoftLayer::new();
    api.on("SoftLayer_Provisioning_Hook.json", fixtures::HOOK)
        .on("SoftLayer_Provisioning_Hook/1234/getObject.json", fixtures::HOOK)
        .on("SoftLayer_Provisioning_Hook/1234.json", "true");

    let service = ProvisioningHookService::new(&api);
    let created = service
        .create_object(&ProvisioningHookTemplate {
            name: "TWC-PostInstallScript".to_string(),
            uri: "http://www.weather.com".to_string(),
            type_id: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1234);

    let fetched = service.get_object(1234).await.unwrap();
    assert_eq!(fetched.uri, "http://www.weather.com");
    assert_eq!(fetched.type_id, Some(1));

    service
        .edit_object(
            1234,
            &ProvisioningHookTemplate {
                name: "TWCEditTestHook".to_string(),
                uri: "http://ww3.weather.com".to_string(),
                type_id: None,
            },
        )
        .await
        .unwrap();
    service.delete_object(1234).await.unwrap();

    let methods: Vec<Method> = api.requests().iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        vec![Method::Post, Method::Get, Method::Put, Method::Delete]
    );
}

#[tokio::test]
async fn test_provisioning_hook_wait_until_present() {
    let api = FakeSoftLayer::new();
    api.on_status("SoftLayer_Provisioning_Hook/1234/getObject.json", 404, "")
        .on_status("SoftLayer_Provisioning_Hook/1234/getObject.json", 404, "")
        .on("SoftLayer_Provisioning_Hook/1234/getObject.json", fixtures::HOOK);

    let clock = Arc::new(ManualClock::new());
    let config = PollConfig::new(Duration::from_secs(30), Duration::from_secs(10)).unwrap();
    let poller = Poller::with_clock(config, clock.clone());

    let hook = ProvisioningHookService::new(&api)
        .wait_until_present_with(1234, &poller)
        .await
        .unwrap();

    assert_eq!(hook.name, "TWC-PostInstallScript");
    assert_eq!(api.count("SoftLayer_Provisioning_Hook/1234/getObject.json"), 3);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(10), Duration::from_secs(10)]
    );
}

use async_trait::async_trait;
use softlayer_core::{ApiRequest, RawResponse, Transport};
use std::collections::VecDeque;
use std::sync::Mutex;

/// In-memory SoftLayer endpoint.
///
/// Responses are queued per exact path; once a queue is down to its last
/// response, that response keeps being served. Unknown paths answer 404.
#[derive(Default)]
pub struct FakeSoftLayer {
    routes: Mutex<Vec<(String, VecDeque<RawResponse>)>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl FakeSoftLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 answer for `path`
    pub fn on(&self, path: &str, body: &str) -> &Self {
        self.on_status(path, 200, body)
    }

    pub fn on_status(&self, path: &str, status: u16, body: &str) -> &Self {
        let response = RawResponse::new(status, body.as_bytes().to_vec());
        let mut routes = self.routes.lock().unwrap();
        match routes.iter_mut().find(|(p, _)| p == path) {
            Some((_, queue)) => queue.push_back(response),
            None => routes.push((path.to_string(), VecDeque::from([response]))),
        }
        self
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Number of requests sent to `path`
    pub fn count(&self, path: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    #[allow(dead_code)]
    pub fn last_to(&self, path: &str) -> Option<ApiRequest> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.path == path)
            .cloned()
    }
}

#[async_trait]
impl Transport for FakeSoftLayer {
    async fn send(&self, request: ApiRequest) -> softlayer_core::Result<RawResponse> {
        let path = request.path.clone();
        self.seen.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.iter_mut().find(|(p, _)| *p == path) {
            Some((_, queue)) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some((_, queue)) => queue.front().cloned().unwrap(),
            None => RawResponse::new(404, br#"{"error":"Unknown path","code":"404"}"#.to_vec()),
        };
        Ok(response)
    }
}

#[allow(dead_code)]
pub mod fixtures {
    pub const DATACENTERS_AMS01: &str = r#"[{"id":265592,"name":"ams01"}]"#;

    pub const LB_PACKAGES: &str =
        r#"[{"id":194,"name":"Load Balancers","isActive":1,"type":{"keyName":"ADDITIONAL_SERVICES_LOAD_BALANCER"}}]"#;

    pub const LB_ITEMS: &str = r#"[
        {"id":1001,"keyName":"DEDICATED_LOAD_BALANCER_WITH_HIGH_AVAILABILITY_AND_SSL_250_CONNECTIONS",
         "capacity":"250","prices":[{"id":44964,"categories":[{"id":40,"name":"Load Balancer"}]}]},
        {"id":1002,"keyName":"DEDICATED_LOAD_BALANCER_WITH_HIGH_AVAILABILITY_AND_SSL_1000_CONNECTIONS",
         "capacity":"1000","prices":[{"id":44965}]}
    ]"#;

    pub const ORDER_RECEIPT: &str = r#"{"orderId":7003,"orderDate":"2016-03-01T10:00:00-06:00"}"#;

    pub const LB: &str = r#"{"id":150585,"connectionLimit":250,"ipAddressId":28772116,
        "ipAddress":{"ipAddress":"161.202.117.116"}}"#;

    pub fn one_lb() -> String {
        format!("[{}]", LB)
    }

    pub fn two_lbs() -> String {
        format!("[{},{}]", LB, LB.replace("150585", "150586"))
    }

    pub const HOOK: &str = r#"{"id":1234,"name":"TWC-PostInstallScript","typeId":1,
        "uri":"http://www.weather.com","createDate":"2016-03-01T10:00:00-06:00"}"#;
}

//! Key resolution
//!
//! SoftLayer operations take numeric ids, while people think in names
//! (`ams01`, `ROUND_ROBIN`). [`resolve`] translates one into the other for any
//! [`ResourceKind`] with a single filtered query and an exact-match scan.

use crate::error::{Result, SoftLayerError};
use crate::query::{ObjectFilter, ObjectMask, decode, execute_query};
use crate::transport::Transport;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A human key or a numeric id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    ById(i64),
    ByName(String),
}

impl LookupKey {
    pub fn as_id(&self) -> Option<i64> {
        match self {
            LookupKey::ById(id) => Some(*id),
            LookupKey::ByName(_) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            LookupKey::ById(_) => None,
            LookupKey::ByName(name) => Some(name),
        }
    }

    /// Filter selecting this key, `{"id":…}` or `{"<name_field>":…}`
    pub fn filter(&self, name_field: &str) -> ObjectFilter {
        match self {
            LookupKey::ById(id) => ObjectFilter::equals("id", *id),
            LookupKey::ByName(name) => ObjectFilter::equals(name_field, name.as_str()),
        }
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKey::ById(id) => write!(f, "{}", id),
            LookupKey::ByName(name) => f.write_str(name),
        }
    }
}

impl From<i64> for LookupKey {
    fn from(id: i64) -> Self {
        LookupKey::ById(id)
    }
}

impl From<&str> for LookupKey {
    fn from(name: &str) -> Self {
        LookupKey::ByName(name.to_string())
    }
}

impl From<String> for LookupKey {
    fn from(name: String) -> Self {
        LookupKey::ByName(name)
    }
}

/// Keys arriving as untyped JSON (templates, CLI payloads) must be an
/// integer or a string; anything else is [`SoftLayerError::InvalidKeyType`].
impl TryFrom<&Value> for LookupKey {
    type Error = SoftLayerError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(LookupKey::ByName(name.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(LookupKey::ById)
                .ok_or_else(|| SoftLayerError::InvalidKeyType(format!("number {}", n))),
            Value::Null => Err(SoftLayerError::InvalidKeyType("null".to_string())),
            Value::Bool(b) => Err(SoftLayerError::InvalidKeyType(format!("bool {}", b))),
            Value::Array(_) => Err(SoftLayerError::InvalidKeyType("array".to_string())),
            Value::Object(_) => Err(SoftLayerError::InvalidKeyType("object".to_string())),
        }
    }
}

/// One candidate record of a resolution table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionEntry {
    pub id: i64,
    pub name: String,
}

/// Decoded candidates for one resource kind, in response order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionTable {
    entries: Vec<ResolutionEntry>,
}

impl ResolutionTable {
    pub fn new(entries: Vec<ResolutionEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ResolutionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counterpart of `key`: the name for an id, the id for a name.
    /// Exact equality, first match in response order.
    pub fn counterpart(&self, key: &LookupKey) -> Option<LookupKey> {
        match key {
            LookupKey::ById(id) => self.name_for(*id).map(|n| LookupKey::ByName(n.to_string())),
            LookupKey::ByName(name) => self.id_for(name).map(LookupKey::ById),
        }
    }

    pub fn id_for(&self, name: &str) -> Option<i64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.id)
    }

    pub fn name_for(&self, id: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    fn name_matches(&self, name: &str) -> usize {
        self.entries.iter().filter(|e| e.name == name).count()
    }
}

/// A record shape that can populate a [`ResolutionTable`]
pub trait Candidate: DeserializeOwned {
    fn into_entry(self) -> ResolutionEntry;
}

/// `{id, name}` records (datacenters, regional location groups)
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl Candidate for NamedRecord {
    fn into_entry(self) -> ResolutionEntry {
        ResolutionEntry {
            id: self.id,
            name: self.name,
        }
    }
}

/// `{id, keyname}` records (routing types, routing methods, health check types)
#[derive(Debug, Clone, Deserialize)]
pub struct KeynameRecord {
    pub id: i64,
    #[serde(default)]
    pub keyname: String,
}

impl Candidate for KeynameRecord {
    fn into_entry(self) -> ResolutionEntry {
        ResolutionEntry {
            id: self.id,
            name: self.keyname,
        }
    }
}

/// Decode a JSON array of `C` records into a table
pub fn decode_table<C: Candidate>(body: &[u8], resource: &str) -> Result<ResolutionTable> {
    let records: Vec<C> = decode(body, resource)?;
    Ok(ResolutionTable::new(
        records.into_iter().map(Candidate::into_entry).collect(),
    ))
}

/// Everything the resolver needs to know about a resource kind
#[derive(Debug, Clone, Copy)]
pub struct ResourceKind {
    /// Short command-line name, e.g. `datacenter`
    pub slug: &'static str,
    /// Human label used in errors, e.g. "Datacenter"
    pub label: &'static str,
    /// SoftLayer service, e.g. `SoftLayer_Location_Datacenter`
    pub collection_path: &'static str,
    /// Natural-key field, `name` or `keyname`
    pub name_field: &'static str,
    /// List method, e.g. `getDatacenters.json`
    pub list_endpoint: &'static str,
    pub decode: fn(&[u8], &str) -> Result<ResolutionTable>,
}

impl ResourceKind {
    pub const DATACENTER: ResourceKind = ResourceKind {
        slug: "datacenter",
        label: "Datacenter",
        collection_path: "SoftLayer_Location_Datacenter",
        name_field: "name",
        list_endpoint: "getDatacenters.json",
        decode: decode_table::<NamedRecord>,
    };

    pub const ROUTING_TYPE: ResourceKind = ResourceKind {
        slug: "routing-type",
        label: "Routing type",
        collection_path: "SoftLayer_Network_Application_Delivery_Controller_LoadBalancer_Routing_Type",
        name_field: "keyname",
        list_endpoint: "getAllObjects.json",
        decode: decode_table::<KeynameRecord>,
    };

    pub const ROUTING_METHOD: ResourceKind = ResourceKind {
        slug: "routing-method",
        label: "Routing method",
        collection_path: "SoftLayer_Network_Application_Delivery_Controller_LoadBalancer_Routing_Method",
        name_field: "keyname",
        list_endpoint: "getAllObjects.json",
        decode: decode_table::<KeynameRecord>,
    };

    pub const HEALTH_CHECK_TYPE: ResourceKind = ResourceKind {
        slug: "health-check-type",
        label: "Health check type",
        collection_path: "SoftLayer_Network_Application_Delivery_Controller_LoadBalancer_Health_Check_Type",
        name_field: "keyname",
        list_endpoint: "getAllObjects.json",
        decode: decode_table::<KeynameRecord>,
    };

    pub const LOCATION_GROUP_REGIONAL: ResourceKind = ResourceKind {
        slug: "regional-group",
        label: "Location group regional",
        collection_path: "SoftLayer_Location_Group_Regional",
        name_field: "name",
        list_endpoint: "getAllObjects.json",
        decode: decode_table::<NamedRecord>,
    };

    pub const ALL: [ResourceKind; 5] = [
        Self::DATACENTER,
        Self::ROUTING_TYPE,
        Self::ROUTING_METHOD,
        Self::HEALTH_CHECK_TYPE,
        Self::LOCATION_GROUP_REGIONAL,
    ];

    /// Built-in kind by its slug
    pub fn from_slug(slug: &str) -> Option<ResourceKind> {
        Self::ALL.into_iter().find(|k| k.slug == slug)
    }

    /// `<collection_path>/<list_endpoint>`
    pub fn list_path(&self) -> String {
        format!("{}/{}", self.collection_path, self.list_endpoint)
    }

    /// Object mask of exactly `{id, name_field}`
    pub fn mask(&self) -> ObjectMask {
        ObjectMask::new(["id", self.name_field])
    }
}

/// Query the candidates of `kind` selected by `key`
pub async fn fetch_table<T: Transport + ?Sized>(
    transport: &T,
    kind: &ResourceKind,
    key: &LookupKey,
) -> Result<ResolutionTable> {
    let body = execute_query(
        transport,
        &kind.list_path(),
        kind.mask(),
        key.filter(kind.name_field),
    )
    .await?;
    let table = (kind.decode)(&body, kind.collection_path)?;

    if let LookupKey::ByName(name) = key {
        let matches = table.name_matches(name);
        if matches > 1 {
            tracing::warn!(
                "{} '{}' matched {} records, using the first one",
                kind.label,
                name,
                matches
            );
        }
    }

    Ok(table)
}

fn not_found(kind: &ResourceKind, key: impl ToString) -> SoftLayerError {
    SoftLayerError::NotFound {
        kind: kind.label.to_string(),
        key: key.to_string(),
    }
}

/// Translate `key` into its counterpart for `kind`: a name for an id, an id
/// for a name.
pub async fn resolve<T: Transport + ?Sized>(
    transport: &T,
    kind: &ResourceKind,
    key: &LookupKey,
) -> Result<LookupKey> {
    fetch_table(transport, kind, key)
        .await?
        .counterpart(key)
        .ok_or_else(|| not_found(kind, key))
}

/// [`resolve`] for an untyped key; non int/string keys fail before any request
pub async fn resolve_value<T: Transport + ?Sized>(
    transport: &T,
    kind: &ResourceKind,
    key: &Value,
) -> Result<LookupKey> {
    let key = LookupKey::try_from(key)?;
    resolve(transport, kind, &key).await
}

/// Numeric id for `name`
pub async fn resolve_id<T: Transport + ?Sized>(
    transport: &T,
    kind: &ResourceKind,
    name: &str,
) -> Result<i64> {
    fetch_table(transport, kind, &LookupKey::from(name))
        .await?
        .id_for(name)
        .ok_or_else(|| not_found(kind, name))
}

/// Name for numeric `id`
pub async fn resolve_name<T: Transport + ?Sized>(
    transport: &T,
    kind: &ResourceKind,
    id: i64,
) -> Result<String> {
    fetch_table(transport, kind, &LookupKey::ById(id))
        .await?
        .name_for(id)
        .map(str::to_string)
        .ok_or_else(|| not_found(kind, id))
}

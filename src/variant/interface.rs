//! Network interface configurations of GPU cluster servers

use super::{decode_value, encode_value, TaggedUnion};
use crate::types::JsonValue;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::net::IpAddr;

const EXTERNAL: &str = "external";
const SUBNET: &str = "subnet";
const ANY_SUBNET: &str = "any_subnet";

/// Optional shape fields are tri-state so a decoded object re-encodes with the
/// same field set: `None` is absent, `Some(None)` an explicit `null` and
/// `Some(Some(v))` a value.
mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// IP stack requested for an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpFamily {
    Ipv4,
    Ipv6,
    Dual,
}

/// Where a floating IP comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatingIpSource {
    New,
    Existing,
}

/// Floating IP attached to an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingIp {
    pub source: FloatingIpSource,
}

impl FloatingIp {
    /// Allocate a new floating IP
    pub fn new_address() -> Self {
        Self {
            source: FloatingIpSource::New,
        }
    }
}

/// Interface in the public network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalInterface {
    #[serde(rename = "type")]
    pub interface_type: String,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub ip_family: Option<Option<IpFamily>>,
}

impl ExternalInterface {
    pub fn new() -> Self {
        Self {
            interface_type: EXTERNAL.to_string(),
            name: None,
            ip_family: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Some(name.into()));
        self
    }

    pub fn with_ip_family(mut self, ip_family: IpFamily) -> Self {
        self.ip_family = Some(Some(ip_family));
        self
    }
}

impl Default for ExternalInterface {
    fn default() -> Self {
        Self::new()
    }
}

/// Interface in a specific subnet of a private network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetInterface {
    #[serde(rename = "type")]
    pub interface_type: String,
    pub network_id: String,
    pub subnet_id: String,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub floating_ip: Option<Option<FloatingIp>>,
}

impl SubnetInterface {
    pub fn new(network_id: impl Into<String>, subnet_id: impl Into<String>) -> Self {
        Self {
            interface_type: SUBNET.to_string(),
            network_id: network_id.into(),
            subnet_id: subnet_id.into(),
            name: None,
            floating_ip: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Some(name.into()));
        self
    }

    pub fn with_floating_ip(mut self, floating_ip: FloatingIp) -> Self {
        self.floating_ip = Some(Some(floating_ip));
        self
    }
}

/// Interface in any subnet of a private network, optionally with a fixed address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnySubnetInterface {
    #[serde(rename = "type")]
    pub interface_type: String,
    pub network_id: String,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub ip_family: Option<Option<IpFamily>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<Option<IpAddr>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub floating_ip: Option<Option<FloatingIp>>,
}

impl AnySubnetInterface {
    pub fn new(network_id: impl Into<String>) -> Self {
        Self {
            interface_type: ANY_SUBNET.to_string(),
            network_id: network_id.into(),
            name: None,
            ip_family: None,
            ip_address: None,
            floating_ip: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Some(name.into()));
        self
    }

    pub fn with_ip_family(mut self, ip_family: IpFamily) -> Self {
        self.ip_family = Some(Some(ip_family));
        self
    }

    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(Some(ip_address));
        self
    }

    pub fn with_floating_ip(mut self, floating_ip: FloatingIp) -> Self {
        self.floating_ip = Some(Some(floating_ip));
        self
    }
}

/// One network interface of a cluster server, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceConfig {
    External(ExternalInterface),
    Subnet(SubnetInterface),
    AnySubnet(AnySubnetInterface),
}

impl TaggedUnion for InterfaceConfig {
    const NAME: &'static str = "InterfaceConfig";
    const DISCRIMINATOR: &'static str = "type";
    const TAGS: &'static [&'static str] = &[EXTERNAL, SUBNET, ANY_SUBNET];

    fn tag(&self) -> &'static str {
        match self {
            Self::External(_) => EXTERNAL,
            Self::Subnet(_) => SUBNET,
            Self::AnySubnet(_) => ANY_SUBNET,
        }
    }

    fn shape_tag(&self) -> &str {
        match self {
            Self::External(shape) => &shape.interface_type,
            Self::Subnet(shape) => &shape.interface_type,
            Self::AnySubnet(shape) => &shape.interface_type,
        }
    }

    fn decode_shape<'de, D>(tag: &str, deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match tag {
            EXTERNAL => ExternalInterface::deserialize(deserializer).map(Self::External),
            SUBNET => SubnetInterface::deserialize(deserializer).map(Self::Subnet),
            ANY_SUBNET => AnySubnetInterface::deserialize(deserializer).map(Self::AnySubnet),
            other => Err(D::Error::unknown_variant(other, Self::TAGS)),
        }
    }

    fn encode_shape(&self) -> serde_json::Result<JsonValue> {
        match self {
            Self::External(shape) => serde_json::to_value(shape),
            Self::Subnet(shape) => serde_json::to_value(shape),
            Self::AnySubnet(shape) => serde_json::to_value(shape),
        }
    }
}

impl From<ExternalInterface> for InterfaceConfig {
    fn from(shape: ExternalInterface) -> Self {
        Self::External(shape)
    }
}

impl From<SubnetInterface> for InterfaceConfig {
    fn from(shape: SubnetInterface) -> Self {
        Self::Subnet(shape)
    }
}

impl From<AnySubnetInterface> for InterfaceConfig {
    fn from(shape: AnySubnetInterface) -> Self {
        Self::AnySubnet(shape)
    }
}

impl Serialize for InterfaceConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        encode_value(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InterfaceConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        decode_value(value).map_err(D::Error::custom)
    }
}

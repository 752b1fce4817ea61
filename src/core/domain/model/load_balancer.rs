//! Wire models for `/iks/clusters/{uuid}/vips`.

use crate::core::domain::value_object::serde_helpers::null_as_default;
use serde::{Deserialize, Serialize};

/// Body of `POST /vips`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IksLoadBalancerRequest {
    pub name: String,
    pub port: i64,
    #[serde(rename = "viptype")]
    pub vip_type: String,
}

/// A VIP document from the VIP endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct IksLoadBalancer {
    #[serde(rename = "vipid", default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port: i64,
    #[serde(rename = "viptype", default)]
    pub vip_type: String,
    #[serde(rename = "vipstate", default)]
    pub vip_state: String,
    #[serde(rename = "vipip", default, deserialize_with = "null_as_default")]
    pub vip_ip: String,
    #[serde(rename = "poolport", default)]
    pub pool_port: i64,
}

/// Body of `GET /vips`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct IksLoadBalancers {
    #[serde(rename = "response", default, deserialize_with = "null_as_default")]
    pub items: Vec<IksLoadBalancer>,
}

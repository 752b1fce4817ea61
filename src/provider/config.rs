//! Provider-block configuration with environment fallback.

use super::{
    diagnostics::Diagnostics,
    schema::{Attribute, AttributeType, Schema},
};
use crate::core::domain::{
    error::ValidationError,
    model::idc_connection::IdcConnection,
    value_object::{ApiToken, CloudAccount, IdcHost, IdcRegion},
};
use serde::Deserialize;
use std::fmt;

pub const ENV_HOST: &str = "IDC_HOST";
pub const ENV_REGION: &str = "IDC_REGION";
pub const ENV_CLOUDACCOUNT: &str = "IDC_CLOUDACCOUNT";
pub const ENV_APITOKEN: &str = "IDC_APITOKEN";

/// The provider block as written by the user.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub cloudaccount: Option<String>,
    #[serde(default)]
    pub apitoken: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("region", &self.region)
            .field("cloudaccount", &self.cloudaccount)
            .field("apitoken", &self.apitoken.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ProviderConfig {
    pub fn schema() -> Schema {
        Schema::new("Interact with IntelCloud (IDC) services.")
            .attribute(
                "host",
                Attribute::optional(AttributeType::String)
                    .describe("Base URL of the IDC API. May also be set with IDC_HOST."),
            )
            .attribute(
                "region",
                Attribute::optional(AttributeType::String)
                    .describe("IDC region, e.g. us-region-1. May also be set with IDC_REGION."),
            )
            .attribute(
                "cloudaccount",
                Attribute::optional(AttributeType::String)
                    .describe("Cloud account all resources belong to. May also be set with IDC_CLOUDACCOUNT."),
            )
            .attribute(
                "apitoken",
                Attribute::optional(AttributeType::String)
                    .sensitive()
                    .describe("Bearer token for the IDC API. May also be set with IDC_APITOKEN."),
            )
    }

    /// Fills unset or empty values from the process environment.
    #[must_use]
    pub fn with_env_fallback(self) -> Self {
        self.with_fallback(|key| std::env::var(key).ok())
    }

    /// Fills unset or empty values from `lookup`, keyed by the `IDC_*` names.
    #[must_use]
    pub fn with_fallback(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |value: Option<String>, key: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .or_else(|| lookup(key).filter(|v| !v.trim().is_empty()))
        };
        Self {
            host: pick(self.host, ENV_HOST),
            region: pick(self.region, ENV_REGION),
            cloudaccount: pick(self.cloudaccount, ENV_CLOUDACCOUNT),
            apitoken: pick(self.apitoken, ENV_APITOKEN),
        }
    }

    /// Validates every value and builds the connection.
    ///
    /// All problems are reported at once, one diagnostic per attribute.
    pub fn into_connection(self) -> Result<IdcConnection, Diagnostics> {
        let mut diags = Diagnostics::new();

        let host = check(&mut diags, "host", ENV_HOST, self.host, IdcHost::new);
        let region = check(&mut diags, "region", ENV_REGION, self.region, IdcRegion::new);
        let cloud_account = check(
            &mut diags,
            "cloudaccount",
            ENV_CLOUDACCOUNT,
            self.cloudaccount,
            CloudAccount::new,
        );
        let api_token = check(&mut diags, "apitoken", ENV_APITOKEN, self.apitoken, ApiToken::new);

        match (host, region, cloud_account, api_token) {
            (Some(host), Some(region), Some(cloud_account), Some(api_token)) if !diags.has_error() => {
                Ok(IdcConnection::new(host, region, cloud_account, api_token))
            }
            _ => Err(diags),
        }
    }
}

fn check<T>(
    diags: &mut Diagnostics,
    attribute: &str,
    env: &str,
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, ValidationError>,
) -> Option<T> {
    let Some(value) = value else {
        diags.add_attribute_error(
            attribute,
            format!("Missing IDC API {}", attribute),
            format!(
                "Set the {} value in the provider configuration or use the {} environment variable.",
                attribute, env
            ),
        );
        return None;
    };
    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            diags.add_attribute_error(attribute, format!("Invalid IDC API {}", attribute), err.to_string());
            None
        }
    }
}

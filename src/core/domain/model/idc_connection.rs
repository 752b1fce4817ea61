use crate::core::domain::value_object::{ApiToken, CloudAccount, IdcHost, IdcRegion};

/// Process-wide connection details, fixed once the provider is configured.
#[derive(Debug, Clone)]
pub struct IdcConnection {
    host: IdcHost,
    region: IdcRegion,
    cloud_account: CloudAccount,
    api_token: ApiToken,
}

impl IdcConnection {
    pub fn new(
        host: IdcHost,
        region: IdcRegion,
        cloud_account: CloudAccount,
        api_token: ApiToken,
    ) -> Self {
        Self {
            host,
            region,
            cloud_account,
            api_token,
        }
    }

    pub fn host(&self) -> &IdcHost {
        &self.host
    }

    pub fn region(&self) -> &IdcRegion {
        &self.region
    }

    pub fn cloud_account(&self) -> &CloudAccount {
        &self.cloud_account
    }

    pub fn api_token(&self) -> &ApiToken {
        &self.api_token
    }
}

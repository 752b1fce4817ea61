mod api_token;
mod cloud_account;
mod idc_host;
mod idc_region;
pub(crate) mod serde_helpers;
mod storage_size;

pub use api_token::ApiToken;
pub use cloud_account::CloudAccount;
pub use idc_host::IdcHost;
pub use idc_region::IdcRegion;
pub use storage_size::{GB_PER_TB, SizeUnit, StorageSize};

pub mod client_config;
pub mod cluster_storage;
pub mod filesystem;
pub mod iks_cluster;
pub mod idc_connection;
pub mod load_balancer;
pub mod node_group;
pub mod status;

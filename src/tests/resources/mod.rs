mod cluster_tests;
mod filesystem_tests;
mod node_group_tests;
mod provider_tests;
mod storage_tests;

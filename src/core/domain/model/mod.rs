pub mod api_response;
pub mod client_config;
pub mod node_list_item;
pub mod outcome;
pub mod proxmox_connection;
pub mod snapshot;
pub mod task;
pub mod vm;

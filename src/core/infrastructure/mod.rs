pub mod api_client;
pub mod context;
pub mod poller;
pub mod url_template;

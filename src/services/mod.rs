pub mod api_client;
pub mod stock_store;

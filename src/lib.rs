pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::ApiError;
pub use services::api_client::ApiClient;
pub use services::stock_store::StockStore;

pub mod cms_client;

pub use cms_client::HttpContentSource;

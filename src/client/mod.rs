pub mod http_client;
pub mod traits;

pub use http_client::HttpImageClient;
pub use traits::ImageApi;

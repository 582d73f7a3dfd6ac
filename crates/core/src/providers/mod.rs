pub mod traits;

// Network implementations
pub mod http_fetcher;

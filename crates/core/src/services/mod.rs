pub mod asset_cache_service;
pub mod chart_service;
pub mod interest;
pub mod investment_service;
pub mod portfolio_service;

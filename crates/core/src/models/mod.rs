pub mod analytics;
pub mod asset;
pub mod chart;
pub mod investment;
pub mod portfolio;
pub mod settings;
pub mod worker;

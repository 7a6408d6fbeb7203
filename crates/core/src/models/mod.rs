pub mod analytics;
pub mod chart;
pub mod holding;
pub mod report;
pub mod risk;
pub mod settings;
pub mod table;

pub mod analytics_service;
pub mod chart_service;
pub mod dashboard_service;
pub mod document_service;
pub mod import_service;

// Application layer - Use cases and ports
pub mod dashboard_service;
pub mod export;
pub mod refresh;
pub mod telemetry_source;
pub mod view;

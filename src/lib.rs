// smfarm telemetry dashboard - layered pipeline library
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

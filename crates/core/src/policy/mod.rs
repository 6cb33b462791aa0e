//! Restriction policy configuration

pub mod service;

pub use service::PolicyService;

//! Load lifecycle service.

pub mod service;

pub use service::LoadService;

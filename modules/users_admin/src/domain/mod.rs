pub mod error;
pub mod generator;
pub mod ports;
pub mod repo;
pub mod service;

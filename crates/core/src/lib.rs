pub mod buffer;
pub mod capture;
pub mod config;
pub mod error;
pub mod severity;
pub mod sink;
pub mod streams;
pub mod surface;

//! Domain Layer
//!
//! The cascade core: pure computation over immutable inputs, no I/O.
//! All filesystem and registry access goes through the traits in `ports`.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;

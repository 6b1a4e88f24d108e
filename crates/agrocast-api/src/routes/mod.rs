//! # Route Modules
//!
//! One router per service. [`crate::build_router`] picks the one the
//! configured service needs.

pub mod collector;
pub mod gateway;
pub mod ml;
pub mod storage;
pub mod visualization;

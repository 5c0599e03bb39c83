//! Background Tasks Module
//!
//! Contains the process-wide garbage-collection loop that sweeps expired
//! entries out of every live memory cache.

pub mod gc;

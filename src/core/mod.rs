//! Core types & traits: arrays, errors and the model contracts plugins implement.

pub mod array;
pub mod error;
pub mod model;

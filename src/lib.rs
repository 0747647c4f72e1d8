pub mod cli;
pub mod core;
pub mod demo;
pub mod domain;
pub mod infra;
pub mod plugins;
pub mod smoke;

pub use crate::core::array::{DType, ResultArray};
pub use crate::demo::{torch_demo, torch_demo_array, DemoMatrix};

#[macro_use]
mod macros;

pub mod app;
pub mod config;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod qrcode;
pub mod storage;
pub mod studio;

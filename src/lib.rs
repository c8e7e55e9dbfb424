pub mod atm;
pub mod config;
pub mod portfolio;
pub mod session;
pub mod utils;

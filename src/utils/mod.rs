pub mod app_context;
pub mod logger;
pub mod wallet;

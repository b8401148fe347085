pub mod config;
pub mod http;
pub mod index;
pub mod storage;

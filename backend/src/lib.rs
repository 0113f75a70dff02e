pub mod cache;
pub mod config;
pub mod db;
pub mod inference;
pub mod knowledge;
pub mod remote;
pub mod routes;
pub mod storage;
pub mod workflow;

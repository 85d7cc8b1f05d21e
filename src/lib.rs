pub mod config;
pub mod dto;
pub mod handlers;
pub mod service;
pub mod startup;

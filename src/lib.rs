pub mod api;
pub mod config;
pub mod hashlist;
pub mod humanize;
pub mod observability;
pub mod processor;
pub mod startup;

pub mod config;
pub mod osc;
pub mod pose;
pub mod protocol;
pub mod speech;
pub mod tracker;

pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pagination;
pub mod scroll;
pub mod sorts;
pub mod tmdb;
pub mod ui;
pub mod utils;
pub mod validation;

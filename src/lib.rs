// src/lib.rs

pub mod client;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

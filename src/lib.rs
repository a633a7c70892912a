pub mod config;
pub mod controllers;
pub mod db;
pub mod errors;
pub mod models;
pub mod relationship;
pub mod render;
pub mod tree;

pub mod controllers;
pub mod dto;
pub mod repositories;
pub mod state;

pub mod collaborators;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod orchestrator;
pub mod terminal;
pub mod tools;
pub mod tracker;

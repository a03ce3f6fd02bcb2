pub mod actor;
pub mod bus;
pub mod commands;
pub mod common;
pub mod context;
pub mod handlers;
pub mod model;
pub mod sys;

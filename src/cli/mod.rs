pub mod app;
pub mod click;
pub mod commands;
pub mod dispatch;
pub mod env;
pub mod inspect;
pub mod output;
pub mod runtime;

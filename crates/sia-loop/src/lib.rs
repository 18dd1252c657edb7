pub mod config;
pub mod runner;

pub use config::SupportLoopConfig;
pub use runner::{open_session, route_topic, run_script, run_turn};

pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;

pub use server::{app_config, run_server_with_config, run_server_with_state};
pub use sia_loop::SupportLoopConfig;
pub use state::AppState;

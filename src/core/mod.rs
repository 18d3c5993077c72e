//! Process-wide runtime state.

pub mod state;

pub use state::{
    is_loop_active, is_shutdown, request_shutdown, set_loop_active, setup_shutdown_handler,
};

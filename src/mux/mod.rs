// ABOUTME: Multiplexer Driver — detached sessions with log-tee, blocking attach, list, kill

mod tmux;
mod types;

pub use tmux::{format_session_name, TmuxDriver};
pub use types::{CreateSessionConfig, MuxError};

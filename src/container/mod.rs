// ABOUTME: Container Driver — uniform run/exec/start/stop/remove/get/list over docker, podman, and devcontainer

mod cli_driver;
mod devcontainer;
mod driver;
mod types;

pub use cli_driver::CliDriver;
pub use devcontainer::DevcontainerDriver;
pub use driver::ContainerDriver;
pub use types::{
    classify_stderr, Container, ContainerError, ContainerFilter, ContainerStatus, ExecConfig,
    ExecOutput, Mount, RunConfig,
};

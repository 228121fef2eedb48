// ABOUTME: One thin async handler per subcommand: parse -> call one Manager method -> print -> exit code

pub mod agent;
pub mod attach;
pub mod exec;
pub mod kill;
pub mod logs;
pub mod ps;
pub mod recreate;
pub mod rm;
pub mod run;
pub mod stop;

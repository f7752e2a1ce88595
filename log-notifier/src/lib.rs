pub mod cli;
pub mod lambda;
pub mod load_config;
pub mod publish;

pub use cli::{run, Cli, Commands};

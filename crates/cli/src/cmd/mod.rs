mod actions;
mod run;

pub use actions::cmd_actions;
pub use run::{RunArgs, cmd_run};

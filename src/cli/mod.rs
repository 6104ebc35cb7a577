mod command;
mod runner;
mod util;

pub use command::Command;
pub use runner::{OutputMode, run, run_offline, run_offline_to, run_to, run_with_format};
pub use util::{build_explain_model, parse_filter_json, parse_output_mode, split_names};

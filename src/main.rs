use std::process::ExitCode;

use diorama::{context::Settings, flow};

fn main() -> ExitCode {
    flow::exit_code(flow::run(Settings::default()))
}

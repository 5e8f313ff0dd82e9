use std::process::ExitCode;

fn main() -> ExitCode {
    testforge_lib::run()
}

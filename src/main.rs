use std::process::ExitCode;

fn main() -> ExitCode {
    uml_generator::cli::run()
}

//! Binary that reports identification and configuration attributes of all
//! reachable cameras.

fn main() {
    env_logger::init();
    std::process::exit(run());
}

#[cfg(feature = "backend_pylon")]
fn run() -> i32 {
    use gige_cam_info::{PylonRuntime, Reporter};
    use std::io;

    let mut reporter = Reporter::new(PylonRuntime::new());
    let stdout = io::stdout();
    let stderr = io::stderr();
    match reporter.run(&mut stdout.lock(), &mut stderr.lock()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}

#[cfg(not(feature = "backend_pylon"))]
fn run() -> i32 {
    eprintln!(
        "this binary was built without a camera transport backend; \
         rebuild with `--features backend_pylon`"
    );
    1
}

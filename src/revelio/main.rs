use revelio::annotate::{AnnotatorConfig, VisionClient};
use revelio::common::init_logger_exe;
use revelio_cli::cli::run;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logger_exe();

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let code = run(
        std::env::args_os(),
        || VisionClient::new(&AnnotatorConfig::from_env()),
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .await;

    log::debug!("Exiting with status {}", code);
    std::process::exit(code);
}

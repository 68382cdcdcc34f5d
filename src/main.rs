/// Entry point for the dockwatch inventory change notifier.
///
/// Initializes logging, loads the settings document, connects to the local
/// container engine and runs the poll loop until the process is terminated.
///
/// # Errors
///
/// Returns an error if startup fails (missing or malformed configuration,
/// unusable state directory, no engine endpoint); the diagnostic is printed
/// and the process exits.
///
/// # Examples
///
/// ```bash
/// DOCKWATCH_CONFIG=/etc/dockwatch/config.yml cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    dockwatch::run().await
}

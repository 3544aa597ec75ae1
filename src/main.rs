use redditkit_core::{CoreError, ErrorReporter};
use tokio::io::AsyncReadExt;
use toolkit::{RedditToolkit, ToolCall};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "redditkit=info,toolkit=info,reddit_client=info";

/// Reads one tool call as JSON from stdin and prints its result to stdout.
/// Empty input prints the tool descriptors instead.
#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting redditkit tool host");

    let reporter = ErrorReporter::new();
    run().await.map_err(|e| {
        reporter.report_error(&e);
        e
    })
}

async fn run() -> Result<(), CoreError> {
    let toolkit = RedditToolkit::from_env()?;

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;

    let output = if input.trim().is_empty() {
        serde_json::to_value(toolkit.get_tools())?
    } else {
        let call: ToolCall = serde_json::from_str(&input)?;
        tracing::info!("Running tool {}", call.name);
        toolkit.invoke(&call).await?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

use anyhow::Result;
use compass_gateway::log_messages::application;
use compass_gateway::{InferencePipeline, Settings};
use std::sync::Arc;
use tracing::{error, info};

/// One-shot invocation: question (and optional context snippet) from argv,
/// reply on stdout. The chat front end talks to the same library entry point.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("{}", application::STARTING);

    let mut args = std::env::args().skip(1);
    let message = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: compass-gateway <question> [context]"))?;
    let context = args.next().unwrap_or_default();

    let settings = Arc::new(Settings::load()?);
    info!("{}", application::SETTINGS_LOADED);

    let pipeline = InferencePipeline::new(settings)?;
    match pipeline.invoke(&message, &context).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(err) => {
            // Typed detail goes to the operator log; the user sees one
            // stable line regardless of which step failed.
            error!(error = %err, "pipeline invocation failed");
            println!("{}", application::USER_FACING_FAILURE);
            Ok(())
        }
    }
}

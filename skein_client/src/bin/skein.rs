use clap::Parser;
use skein_client::config::ClientConfig;
use skein_client::manager::{InputRequest, OutputRecord, SessionManager};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Client config file location
    #[arg(short, long)]
    config: PathBuf,

    /// Validate the config file and exit
    #[arg(long)]
    check: bool,
}

/// Main entry point.
///
/// Loads and validates the configuration before anything else, so that
/// errors are reported before any connection is attempted, then runs the
/// session manager on a single-threaded runtime.
pub fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let config = ClientConfig::load_file(&args.config)?;
    config.validate()?;

    if args.check {
        eprintln!("{}: OK", args.config.display());
        return Ok(());
    }

    skein_client::tracing_config::build_subscriber(config.logging.clone())?.init();

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(config))
}

async fn run(config: ClientConfig) -> Result<(), anyhow::Error> {
    let (record_send, record_recv) = unbounded_channel();
    let (input_send, input_recv) = unbounded_channel();

    let mut manager = SessionManager::new(record_send);
    for session in &config.sessions {
        manager.add_session(session)?;
    }

    let writer = tokio::spawn(write_records(record_recv));
    tokio::spawn(read_input(input_send));

    manager.connect_all();
    manager.run(input_recv).await;

    // Dropping the manager closes the record stream, which lets the writer
    // finish once everything queued is out
    drop(manager);
    writer.await??;
    Ok(())
}

/// Read input requests, one JSON object per line, until stdin closes
async fn read_input(input: UnboundedSender<InputRequest>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match serde_json::from_str::<InputRequest>(&line) {
                Ok(request) => {
                    if input.send(request).is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!(%line, "Ignoring bad input request: {}", e),
            },
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Error reading input: {}", e);
                break;
            }
        }
    }
}

/// Write replication records to stdout, one JSON object per line
async fn write_records(mut records: UnboundedReceiver<OutputRecord>) -> Result<(), anyhow::Error> {
    let mut stdout = tokio::io::stdout();

    while let Some(record) = records.recv().await {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        stdout.write_all(line.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use concierge_assistant::Controller;
use concierge_core::types::Turn;

#[derive(Parser)]
#[command(name = "concierge")]
#[command(about = "Interactive multi-intent assistant")]
#[command(version)]
struct Args {
    /// Directory holding config.toml; relative paths resolve against it
    #[arg(long, env = "CONCIERGE_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, _) = concierge_cli::bootstrap(&args.config_dir)?;
    let mut controller = Controller::from_config(&config).await?;

    println!("🤖 AI Assistant (CLI Mode). Type your question. Type 'exit' to quit.\n");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("🧑 You: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else { break };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }
        let result = controller.handle(Turn::new(input)).await;
        println!("\n🤖 Assistant:\n{}", result.response_text);
        if let Some(path) = &result.image_path {
            println!("[🖼️ Image saved at: {}]\n", path.display());
        }
    }
    println!("\n👋 Goodbye!");
    Ok(())
}

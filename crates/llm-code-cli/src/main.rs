//! llm-code: coding assistant using OpenAI's chat models.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use llm_code_client::OpenAiClient;
use llm_code_store::RecordStore;
use llm_code_templates::{builtin_library, TemplateLibrary};

use llm_code_cli::{gather_inputs, output, run_exchange, CliError, Settings};

/// Exit status when the reply contained no code: the tool's purpose was not
/// fulfilled even though the exchange succeeded.
const EXIT_NO_CODE: u8 = 1;

/// Coding assistant using OpenAI's chat models.
///
/// Requires OPENAI_API_KEY in the environment, or in `~/.llm-code/env`.
#[derive(Parser)]
#[command(name = "llm-code", version, about)]
struct Cli {
    /// Glob of input files to include in the prompt.
    #[arg(short, long)]
    inputs: Option<String>,

    /// Show line numbers when printing code.
    #[arg(short = 'l', long = "line-numbers")]
    line_numbers: bool,

    /// What the assistant should write.
    instructions: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(status) => status,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let settings = Settings::load()?;
    // The credential is checked before any template load or network call.
    let api_key = settings.require_api_key()?.to_string();

    let instructions = cli.instructions.join(" ");
    if instructions.trim().is_empty() {
        return Err(CliError::Usage("please provide some instructions".to_string()));
    }

    let store = RecordStore::open(settings.db_path()).await?;

    let library = match TemplateLibrary::load(&[settings.config_dir.clone()]) {
        Some(library) => library,
        None => builtin_library()
            .map_err(|err| CliError::Usage(format!("no templates found: {err}")))?,
    };

    let input = gather_inputs(cli.inputs.as_deref())?;

    let mut client = OpenAiClient::new(api_key)?;
    if let Some(base) = &settings.api_base {
        client = client.with_base_url(base);
    }

    let outcome = run_exchange(&settings, &library, &client, &store, &instructions, &input).await?;
    store.close().await;

    if let Some(err) = &outcome.logging_error {
        eprintln!("warning: the exchange could not be logged: {err}");
    }

    match &outcome.code {
        Some(block) => {
            output::print_code(block, cli.line_numbers);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            output::print_no_code(outcome.reply.content());
            Ok(ExitCode::from(EXIT_NO_CODE))
        }
    }
}

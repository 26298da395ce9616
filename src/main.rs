use clap::Parser;
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tracing::info;

use deep_research::cli::{run_interactive, Cli, Command, EVAL_BANNER, EVAL_PROMPT, RESEARCH_PROMPT};
use deep_research::config::Config;
use deep_research::llm::{LLMAdapter, LLMProviderConfig, LLM};
use deep_research::search::{SearchProvider, TavilyClient};
use deep_research::utils::init_logger;
use deep_research::{Evaluator, ResearchPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (.env first so RUST_LOG from it is honoured)
    let config = Config::from_env()?;
    let _log_guard = init_logger(&config.logging)?;

    let agent_config = Arc::new(cli.agent_config()?);

    let llm: Arc<dyn LLMAdapter> = Arc::new(LLM::new(LLMProviderConfig::from_config(&config.llm)?));
    let search: Arc<dyn SearchProvider> = Arc::new(
        TavilyClient::from_config(&config.search)?.with_max_results(agent_config.num_searches),
    );
    let pipeline = ResearchPipeline::new(llm.clone(), search);

    info!(provider = %config.llm.provider, "Services configured");
    println!(
        "\nUsing model={}, num_searches={}\n",
        agent_config.model, agent_config.num_searches
    );

    let stdin = BufReader::new(io::stdin());
    let stdout = io::stdout();

    let handled = match cli.command() {
        Command::Research => {
            run_interactive(stdin, stdout, RESEARCH_PROMPT, Some("\nGenerating report...\n\n"), |query| {
                let pipeline = &pipeline;
                let agent_config = agent_config.clone();
                async move { Ok::<_, anyhow::Error>(pipeline.run_research(&query, agent_config).await?) }
            })
            .await?
        }
        Command::Eval { json } => {
            let evaluator = Evaluator::new(pipeline, llm, config.llm.judge_model.clone());
            println!("{}", EVAL_BANNER);

            run_interactive(stdin, stdout, EVAL_PROMPT, None, |query| {
                let evaluator = &evaluator;
                let agent_config = agent_config.clone();
                async move {
                    let result = evaluator.run_all_evals(&query, agent_config).await?;
                    let rendered = if json {
                        serde_json::to_string_pretty(&result)?
                    } else {
                        result.to_string()
                    };
                    Ok::<_, anyhow::Error>(rendered)
                }
            })
            .await?
        }
    };

    info!(handled, "Session finished");
    Ok(())
}

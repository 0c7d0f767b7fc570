use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use semalign::analysis::{
    calculate_cumulative_impact, calculate_score_predictions, enhance_text, AnalysisMode,
    AnalysisRequest, Analyzer, AnalyzerOptions,
};
use semalign::cli::{parse_keywords, Cli, Commands};
use semalign::config::Settings;
use semalign::providers::{EmbeddingProvider, OpenAIChat, OpenAIEmbeddings};
use semalign::ui::Console;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load()?;
    let console = Console::new();

    match cli.command {
        Commands::Analyze {
            keywords,
            main,
            competitor,
            chunked,
            json,
        } => {
            let request = build_request(&keywords, &main, &competitor, chunked)?;
            let analyzer = build_analyzer(&settings)?;
            let result = analyzer.analyze(&request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let predictions =
                    calculate_score_predictions(&result.keyword_coverage, result.main_score_percent);
                let cumulative = calculate_cumulative_impact(&predictions);
                console.report(&result, &predictions, cumulative);
            }
        }
        Commands::Enhance {
            keywords,
            main,
            competitor,
            output,
        } => {
            let request = build_request(&keywords, &main, &competitor, true)?;
            let analyzer = build_analyzer(&settings)?;
            let result = analyzer.analyze(&request).await?;

            let api_key = settings.completion_api_key().with_context(|| {
                format!(
                    "Completion API key not found. Set the {} env var.",
                    settings.completion.api_key_env
                )
            })?;
            let mut chat = OpenAIChat::new(api_key)
                .with_model(&settings.completion.model, settings.completion.max_tokens);
            if let Some(url) = &settings.completion.base_url {
                chat = chat.with_base_url(url);
            }

            let rewritten =
                enhance_text(&chat, &request.main_text, &result.section_improvements).await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &rewritten)
                        .with_context(|| format!("Failed to write {}", path))?;
                    console.success(&format!("Rewritten text written to {}", path));
                }
                None => println!("{}", rewritten),
            }
        }
        Commands::Config => {
            console.info(&format!(
                "Config file: {}",
                Settings::config_path()?.display()
            ));
            println!("{}", toml::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn build_request(
    keyword_spec: &str,
    main_path: &str,
    competitor_path: &str,
    chunked: bool,
) -> Result<AnalysisRequest> {
    let keywords = parse_keywords(keyword_spec).map_err(|e| anyhow::anyhow!(e))?;
    let main_text = std::fs::read_to_string(main_path)
        .with_context(|| format!("Failed to read {}", main_path))?;
    let competitor_text = std::fs::read_to_string(competitor_path)
        .with_context(|| format!("Failed to read {}", competitor_path))?;

    Ok(AnalysisRequest {
        keywords,
        main_text,
        competitor_text,
        mode: if chunked {
            AnalysisMode::Chunked
        } else {
            AnalysisMode::Full
        },
    })
}

fn build_analyzer(settings: &Settings) -> Result<Analyzer> {
    let api_key = settings.embedding_api_key().with_context(|| {
        format!(
            "Embedding API key not found. Set the {} env var.",
            settings.embedding.api_key_env
        )
    })?;

    let mut embeddings = OpenAIEmbeddings::new(api_key)
        .with_model(&settings.embedding.model, settings.embedding.dimension);
    if let Some(url) = &settings.embedding.base_url {
        embeddings = embeddings.with_base_url(url);
    }

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(embeddings);
    Ok(Analyzer::with_options(
        provider,
        AnalyzerOptions {
            max_concurrent_embeddings: settings.analysis.max_concurrent_embeddings,
            chunk_words: settings.analysis.chunk_words,
            overlap_words: settings.analysis.overlap_words,
        },
    ))
}

/// Default log filter; `--verbose` raises it to debug. An explicit
/// `RUST_LOG` still wins over both.
fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "semalign=debug"
    } else {
        "semalign=info"
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

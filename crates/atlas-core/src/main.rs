//! InferenceAtlas CLI — rank LLM hosting options by cost and risk.

use atlas_core::catalog::Catalog;
use atlas_core::{ranker, traffic, utilization};
use atlas_parse::anthropic::AnthropicAdapter;
use atlas_parse::openai::OpenAiAdapter;
use atlas_parse::router::{parse_workload_text, ParseRouter};
use atlas_parse::schema::WorkloadSpec;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "atlas",
    about = "Rank LLM hosting options by monthly cost and risk",
    version
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank platform options for a workload.
    Recommend {
        /// Daily token volume.
        #[arg(long)]
        tokens_per_day: f64,
        /// Traffic pattern (steady, business_hours, bursty).
        #[arg(long, default_value = "steady")]
        pattern: String,
        /// Model key (e.g. llama_70b).
        #[arg(long, default_value = "llama_70b")]
        model: String,
        /// Latency requirement in milliseconds.
        #[arg(long)]
        latency_ms: Option<f64>,
        /// Number of ranked options to return.
        #[arg(long, default_value = "3")]
        top_k: usize,
        /// Path to a TOML catalog file (defaults to the built-in catalog).
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Output results to JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Estimate GPU count and utilization for a workload.
    Estimate {
        /// Daily token volume.
        #[arg(long)]
        tokens_per_day: f64,
        /// Traffic pattern (steady, business_hours, bursty).
        #[arg(long, default_value = "steady")]
        pattern: String,
        /// Raw GPU throughput in tokens/sec.
        #[arg(long)]
        gpu_tps: f64,
        /// Model key (e.g. llama_70b).
        #[arg(long, default_value = "llama_70b")]
        model: String,
    },
    /// Parse a free-text workload description into a validated spec.
    Parse {
        /// Free-form workload description.
        text: String,
        /// Manual fallback: daily token volume.
        #[arg(long)]
        fallback_tokens_per_day: Option<f64>,
        /// Manual fallback: traffic pattern.
        #[arg(long)]
        fallback_pattern: Option<String>,
        /// Manual fallback: model key.
        #[arg(long)]
        fallback_model: Option<String>,
        /// Manual fallback: latency requirement in milliseconds.
        #[arg(long)]
        fallback_latency_ms: Option<f64>,
    },
    /// List cataloged platforms with billing modes.
    ListPlatforms {
        /// Path to a TOML catalog file (defaults to the built-in catalog).
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// List cataloged models with memory requirements.
    ListModels {
        /// Path to a TOML catalog file (defaults to the built-in catalog).
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// List supported traffic pattern names.
    ListPatterns,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    match cli.command {
        Commands::Recommend {
            tokens_per_day,
            pattern,
            model,
            latency_ms,
            top_k,
            catalog,
            output,
        } => {
            let catalog = load_catalog(catalog.as_deref());
            let recommendations = ranker::rank(
                &catalog,
                tokens_per_day,
                &pattern,
                &model,
                latency_ms,
                top_k,
            )
            .unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });

            println!("{}", ranker::format_table(&recommendations));

            if let Some(output_path) = output {
                let json = serde_json::to_string_pretty(&recommendations).unwrap_or_else(|e| {
                    eprintln!("Error serializing results: {}", e);
                    std::process::exit(1);
                });
                std::fs::write(&output_path, json).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {}", e);
                    std::process::exit(1);
                });
                println!("Results written to {}", output_path.display());
            }
        }
        Commands::Estimate {
            tokens_per_day,
            pattern,
            gpu_tps,
            model,
        } => {
            let estimate = utilization::estimate(tokens_per_day, &pattern, gpu_tps, &model)
                .unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });
            println!(
                "Active hours/month:    {:.1}",
                estimate.active_hours_per_month
            );
            println!(
                "Avg tokens/sec:        {:.2}",
                estimate.avg_tokens_per_second_global
            );
            println!(
                "Required peak tok/sec: {:.2}",
                estimate.required_peak_tokens_per_second
            );
            println!(
                "Effective GPU tok/sec: {:.2}",
                estimate.effective_gpu_tokens_per_second
            );
            println!("Utilization ratio:     {:.3}", estimate.utilization_ratio);
            println!("GPU count:             {}", estimate.gpu_count);
            println!("Utilization after:     {:.3}", estimate.utilization_after);
        }
        Commands::Parse {
            text,
            fallback_tokens_per_day,
            fallback_pattern,
            fallback_model,
            fallback_latency_ms,
        } => {
            let fallback = match (fallback_tokens_per_day, fallback_pattern, fallback_model) {
                (Some(tokens_per_day), Some(pattern), Some(model_key)) => Some(WorkloadSpec {
                    tokens_per_day,
                    pattern,
                    model_key,
                    latency_requirement_ms: fallback_latency_ms,
                }),
                _ => None,
            };

            let primary = AnthropicAdapter::from_env().unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            let router =
                ParseRouter::with_fallback(Box::new(primary), Box::new(OpenAiAdapter::new()));
            let outcome = parse_workload_text(&router, &text, fallback).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });

            if let Some(warning) = &outcome.warning {
                eprintln!("Warning: {}", warning);
            }
            let json = serde_json::to_string_pretty(&outcome.workload).unwrap_or_else(|e| {
                eprintln!("Error serializing workload: {}", e);
                std::process::exit(1);
            });
            println!("{}", json);
            eprintln!("Provider used: {}", outcome.provider_used);
        }
        Commands::ListPlatforms { catalog } => {
            let catalog = load_catalog(catalog.as_deref());
            println!("Cataloged platforms:");
            for (key, platform) in &catalog.platforms {
                println!("  - {} ({} billing)", key, platform.billing());
            }
        }
        Commands::ListModels { catalog } => {
            let catalog = load_catalog(catalog.as_deref());
            println!("Cataloged models:");
            for (key, model) in &catalog.models {
                println!(
                    "  - {} ({}, {}GB recommended)",
                    key, model.display_name, model.recommended_memory_gb
                );
            }
        }
        Commands::ListPatterns => {
            println!("Supported traffic patterns:");
            for name in traffic::pattern_names() {
                println!("  - {}", name);
            }
        }
    }
}

fn load_catalog(path: Option<&std::path::Path>) -> Catalog {
    match path {
        Some(path) => Catalog::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading catalog: {}", e);
            std::process::exit(1);
        }),
        None => Catalog::builtin(),
    }
}

use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vocab_core::config::PipelineConfig;
use vocab_core::core::matcher::MatchReport;
use vocab_core::core::sampler::Sampler;
use vocab_core::core::types::{AssembledExample, MatchResult};
use vocab_core::coverage::CoverageReport;
use vocab_core::persistence::{load_dataset, load_matches, load_ranked_words, save_dataset, save_matches};
use vocab_core::{VocabEngine, VocabError};

#[derive(Parser)]
#[command(name = "nzsl_vocab", about = "Build and query the NZSL vocabulary trainer dataset")]
struct Cli {
    /// TOML pipeline config; defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Match a ranked word list against the dictionary
    Match {
        #[arg(long)]
        words: PathBuf,
        #[arg(long)]
        dictionary: PathBuf,
        #[arg(long, default_value = "matched_signs.json")]
        out: PathBuf,
    },
    /// Assemble example videos for the top-K matched signs
    Assemble {
        #[arg(long, default_value = "matched_signs.json")]
        matches: PathBuf,
        #[arg(long)]
        dictionary: PathBuf,
        #[arg(long, default_value = "video_examples.json")]
        out: PathBuf,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Report which top-K signs lack finished example videos
    Coverage {
        #[arg(long, default_value = "matched_signs.json")]
        matches: PathBuf,
        #[arg(long)]
        dictionary: PathBuf,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Pick one random playable example
    Sample {
        #[arg(long, default_value = "video_examples.json")]
        dataset: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the definition of one sign
    Define {
        #[arg(long, default_value = "video_examples.json")]
        dataset: PathBuf,
        #[arg(long)]
        id: i64,
    },
}

fn main() -> Result<(), VocabError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Command::Match { words, dictionary, out } => {
            let engine = VocabEngine::from_file(&dictionary, config)?;
            let words = load_ranked_words(&words)?;
            let results = engine.match_words(&words);
            save_matches(&results, &out)?;
            print_match_report(&results, engine.config().low_confidence_threshold);
        }
        Command::Assemble { matches, dictionary, out, top_k } => {
            if let Some(k) = top_k {
                config.top_k = k;
            }
            let engine = VocabEngine::from_file(&dictionary, config)?;
            let dataset = engine.assemble(&load_matches(&matches)?);
            save_dataset(&dataset, &out)?;

            let summary = dataset.summary();
            println!(
                "\nExtracted {} video examples for the top {} signs",
                summary.examples.to_string().bold(),
                dataset.top_k
            );
            println!("Covering {} unique signs", summary.unique_signs);
            println!("\nBreakdown by example type:");
            for (category, count) in &summary.by_category {
                println!("  {category}: {count} videos");
            }
        }
        Command::Coverage { matches, dictionary, top_k } => {
            if let Some(k) = top_k {
                config.top_k = k;
            }
            let engine = VocabEngine::from_file(&dictionary, config)?;
            let report = engine.coverage(&load_matches(&matches)?);
            print_coverage(&report);
        }
        Command::Sample { dataset, seed } => {
            let dataset = load_dataset(&dataset)?;
            let sampler = Sampler::new(&dataset, config.max_sample_attempts);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            print_example(sampler.sample_one(&mut rng)?);
        }
        Command::Define { dataset, id } => {
            let dataset = load_dataset(&dataset)?;
            match dataset.definition(id) {
                Some(def) => {
                    println!("Sign: {}", def.gloss.as_str().bold());
                    if !def.minor_meanings.is_empty() {
                        println!("Also means: {}", def.minor_meanings);
                    }
                    match &def.definition_video_url {
                        Some(url) => println!("Video: {url}"),
                        None => println!("{}", "No definition video available".yellow()),
                    }
                }
                None => println!("{}", format!("No definition for sign {id}").red()),
            }
        }
    }
    Ok(())
}

fn print_match_report(results: &[MatchResult], threshold: f64) {
    let report = MatchReport::new(results, threshold);
    println!(
        "\nMatched {} out of {} words ({:.1}%)",
        report.matched.to_string().green(),
        report.total,
        report.matched_percent()
    );
    if !report.low_confidence.is_empty() {
        println!(
            "\n{}",
            format!("Low confidence matches ({} words):", report.low_confidence.len()).yellow()
        );
        for r in &report.low_confidence {
            println!(
                "  {} -> {} ({:.3})",
                r.source_word,
                r.matched_gloss.as_deref().unwrap_or("-"),
                r.confidence
            );
        }
    }
}

fn print_coverage(report: &CoverageReport) {
    for sign in &report.covered {
        println!(
            "{} {:15} (rank {:3}) - {} examples",
            "✓".green(),
            sign.word,
            sign.rank,
            sign.examples
        );
    }
    for gap in &report.missing {
        println!("{} {:15} (rank {:3}) - NO examples", "✗".red(), gap.word, gap.rank);
    }
    println!("\n{}", "=".repeat(60));
    println!("Total signs checked: {}", report.checked);
    println!("Signs WITH examples: {}", report.with_examples());
    println!("Signs WITHOUT examples: {}", report.without_examples());
    println!("Total video examples found: {}", report.total_examples);
    println!("Examples with NULL/empty video URLs: {}", report.missing_video_urls);
}

fn print_example(example: &AssembledExample) {
    println!(
        "{} [{}] (rank {}) - {}",
        example.actual_gloss.as_str().bold(),
        example.common_word,
        example.rank,
        example.video_type
    );
    if let Some(url) = &example.video_url {
        println!("Video: {url}");
    }
    println!("Translation: {}", example.english_translation);
    if example.sign_sequence.is_empty() {
        println!("{}", "No sign sequence available".dark_grey());
    } else {
        let signs: Vec<String> = example
            .sign_sequence
            .iter()
            .map(|t| format!("{} ({})", t.word, t.gloss))
            .collect();
        println!("Signs: {}", signs.join(" → "));
    }
}

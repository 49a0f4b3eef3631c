use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use faqbot_core::{
    evaluate_cases, load_entity_schema, load_knowledge_csv, load_templates, AppConfig, EvalCase,
    IntentClassifier, Pipeline, RegexNer, TemplateCatalog,
};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "faqbot")]
#[command(about = "Rule-based FAQ chatbot over a curated knowledge base")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Answer a single question and exit.
    Ask {
        #[arg(long)]
        question: String,
    },
    /// Interactive question/answer loop.
    Chat,
    /// Run evaluation cases against the pipeline.
    Eval {
        #[arg(long)]
        cases: PathBuf,
        #[arg(long, default_value_t = 0.85)]
        min_pass_rate: f32,
    },
}

fn build_pipeline(config: &AppConfig) -> Result<Pipeline> {
    let entries = load_knowledge_csv(&config.data.faq_csv)
        .with_context(|| format!("load {}", config.data.faq_csv.display()))?;
    let schema = load_entity_schema(&config.data.ner_json)
        .with_context(|| format!("load {}", config.data.ner_json.display()))?;
    let templates = load_templates(&config.data.templates_json)
        .with_context(|| format!("load {}", config.data.templates_json.display()))?;

    Ok(Pipeline::new(
        entries,
        RegexNer::new(&schema),
        IntentClassifier::default(),
        TemplateCatalog::new(templates),
        &config.index_params(),
        config.retriever.top_k,
    ))
}

fn read_eval_cases(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let cases: Vec<EvalCase> = serde_json::from_reader(file).context("parse eval cases json")?;
    Ok(cases)
}

fn chat(pipeline: &Pipeline) -> Result<()> {
    println!("FAQ UV-BF (CLI)");
    println!("Tapez votre question (ou 'quit' pour sortir)");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("\nVous: ");
        stdout.flush().context("flush prompt")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("read question")? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("quit") || question.eq_ignore_ascii_case("exit") {
            break;
        }

        let resolution = pipeline.answer(question);
        println!(
            "\nBot (intent={} | score={:.3}):",
            resolution.intent, resolution.confidence
        );
        println!("{}", resolution.text);
    }

    Ok(())
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("load config {}", cli.config.display()))?;
    let pipeline = build_pipeline(&config)?;
    tracing::info!(entries = pipeline.entries().len(), "pipeline ready");

    match &cli.command {
        Commands::Ask { question } => {
            let resolution = pipeline.answer(question);
            println!(
                "intent={} score={:.4} source={:?} entry_id={}",
                resolution.intent,
                resolution.confidence,
                resolution.source,
                resolution.entry_id.as_deref().unwrap_or("null")
            );
            if !resolution.entities.is_empty() {
                println!(
                    "entities={}",
                    serde_json::to_string(&resolution.entities).context("serialize entities")?
                );
            }
            println!("{}", resolution.text);
        }
        Commands::Chat => chat(&pipeline)?,
        Commands::Eval {
            cases,
            min_pass_rate,
        } => {
            let cases = read_eval_cases(cases)?;
            let summary = evaluate_cases(&pipeline, &cases);

            for o in &summary.outcomes {
                println!(
                    "case={} passed={} category={} source={:?} score={:.4} latency={:.1}ms",
                    o.case_id, o.passed, o.actual_category, o.actual_source, o.confidence,
                    o.latency_ms
                );
            }
            println!(
                "total={} passed={} failed={} pass_rate={:.4} required={:.4}",
                summary.total, summary.passed, summary.failed, summary.pass_rate, min_pass_rate
            );

            if summary.pass_rate < *min_pass_rate {
                anyhow::bail!(
                    "pass rate {:.4} below required {:.4}",
                    summary.pass_rate,
                    min_pass_rate
                );
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

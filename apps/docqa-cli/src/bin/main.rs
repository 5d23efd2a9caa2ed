use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use docqa_core::chunker::Chunker;
use docqa_core::config::{Config, Settings};
use docqa_core::traits::TextExtractor;
use docqa_embed::get_default_embedder;
use docqa_hybrid::Session;
use docqa_text::AutoExtractor;

#[derive(Parser, Debug)]
#[command(name = "docqa", version, about = "Ask questions about a single Turkish document")]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    /// Use the hashed embedder instead of loading a BERT model
    #[arg(long, global = true, default_value_t = false)]
    fake_embeddings: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one question
    Ask(QuestionArgs),
    /// Read questions from stdin, one per line
    Chat(FileArgs),
    /// Print the ranked candidate chunks for a question
    Search(QuestionArgs),
    /// Print the chunks a document is split into
    Chunks(FileArgs),
}

#[derive(Args, Debug, Clone)]
struct FileArgs {
    file: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct QuestionArgs {
    file: PathBuf,
    question: String,
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Config::load_from(&cli.config_dir)?.settings()?;
    if cli.fake_embeddings {
        settings.embedding.use_fake = true;
    }

    match &cli.command {
        Commands::Ask(args) => ask(&cli, settings, args),
        Commands::Chat(args) => chat(&cli, settings, args),
        Commands::Search(args) => search(&cli, settings, args),
        Commands::Chunks(args) => chunks(&cli, settings, args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn open_session(settings: Settings, file: &Path) -> Result<Session> {
    let embedder = get_default_embedder(&settings.embedding)?;
    let session = Session::new(settings, Arc::from(embedder))?;
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let record = session.ingest(&display_name(file), &bytes)?;
    eprintln!("{}: {} chunks, {} characters", record.filename, record.chunk_count, record.text_length);
    Ok(session)
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

fn ask(cli: &Cli, settings: Settings, args: &QuestionArgs) -> Result<()> {
    let session = open_session(settings, &args.file)?;
    print_answer(cli, &session, &args.question)
}

fn print_answer(cli: &Cli, session: &Session, question: &str) -> Result<()> {
    let answer = session.ask(question)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        println!("{}", answer.text);
        println!("  confidence: {:.3}  keyword matches: {}", answer.confidence, answer.keyword_matches);
    }
    Ok(())
}

fn chat(cli: &Cli, settings: Settings, args: &FileArgs) -> Result<()> {
    let session = open_session(settings, &args.file)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let question = line.trim();
        if matches!(question, "exit" | "quit" | "çıkış") {
            break;
        }
        if !question.is_empty() {
            // A bad question should not end the conversation.
            if let Err(e) = print_answer(cli, &session, question) {
                eprintln!("{e}");
            }
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}

fn search(cli: &Cli, settings: Settings, args: &QuestionArgs) -> Result<()> {
    let session = open_session(settings, &args.file)?;
    let results = session.search(&args.question)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    println!("{:>4}  {:>7}  {:>7}  {:>5}  text", "rank", "hybrid", "embed", "kw");
    for (rank, r) in results.iter().enumerate() {
        println!(
            "{:>4}  {:>7.3}  {:>7.3}  {:>5}  [{}] {}",
            rank + 1,
            r.hybrid_score,
            r.embedding_score,
            r.keyword_match_count,
            r.chunk_index,
            preview(&r.chunk_text, 80)
        );
    }
    Ok(())
}

fn chunks(cli: &Cli, settings: Settings, args: &FileArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let text = AutoExtractor::default().extract_text(&bytes)?;
    let chunks = Chunker::new(settings.chunking)?.chunk(&text);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }
    for chunk in &chunks {
        println!("{:>4}  {:>4} words  {}", chunk.id, chunk.word_count, preview(&chunk.text, 80));
    }
    println!("{} chunks", chunks.len());
    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}…")
}

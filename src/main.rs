use anyhow::{Context, Result};
use clap::Parser;
use entity_chunker::{ChunkConfig, Chunker, Document, Plan, RelevanceSource, SpanLocator};
use std::fs;
use std::path::PathBuf;

const SAMPLE_TEXT: &str =
    "Yesterday she had [abdominal pain] and [fever] for an hour. [Vomiting] was not present.";
const SAMPLE_ENTITIES: [&str; 3] = ["abdominal pain", "fever", "Vomiting"];

/// Split annotated text into bounded chunks that keep every entity whole
#[derive(Parser, Debug)]
#[command(name = "entity-chunker", version)]
struct Args {
    /// Text to chunk (defaults to a built-in clinical sample)
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Read the text to chunk from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Entity name to locate; repeat for several names
    #[arg(short, long = "entity", value_name = "NAME")]
    entities: Vec<String>,

    /// Search for names exactly as given instead of wrapped in delimiters
    #[arg(long)]
    raw_names: bool,

    /// Ignore ASCII case when locating names
    #[arg(long)]
    case_insensitive: bool,

    /// JSON chunking config; flags below override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum tokens per chunk
    #[arg(long)]
    max_chunk_size: Option<usize>,

    /// Minimum context tokens around entities
    #[arg(long)]
    min_padding: Option<usize>,

    /// Where token relevance comes from: entities or delimiters
    #[arg(long, value_name = "SOURCE")]
    relevance: Option<RelevanceSource>,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,

    /// Keep entity delimiters in printed chunk text
    #[arg(long)]
    keep_markers: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let chunker = Chunker::new(load_config(&args)?).context("Invalid chunking configuration")?;
    let delimiters = chunker.config().delimiters;

    let (text, names) = read_input(&args)?;
    let document = Document::from_text(&text);

    let names: Vec<String> = if args.raw_names {
        names
    } else {
        names.iter().map(|name| delimiters.wrap(name)).collect()
    };
    let entities = SpanLocator::new()
        .case_insensitive(args.case_insensitive)
        .locate(document.text(), &names);
    tracing::info!(
        tokens = document.len(),
        names = names.len(),
        entities = entities.len(),
        "input loaded"
    );

    let plan = chunker
        .plan(&document, &entities)
        .context("Failed to plan chunks")?;

    if args.json {
        let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
        println!("{}", json);
    } else {
        print_plan(&plan, &document, &args, chunker.config());
    }

    Ok(())
}

/// Config file first, then command-line overrides
fn load_config(args: &Args) -> Result<ChunkConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            ChunkConfig::from_json(&raw)
                .with_context(|| format!("Invalid config at {}", path.display()))?
        }
        None => ChunkConfig::default(),
    };

    if let Some(size) = args.max_chunk_size {
        config.max_chunk_size = size;
    }
    if let Some(padding) = args.min_padding {
        config.min_padding = padding;
    }
    if let Some(relevance) = args.relevance {
        config.relevance = relevance;
    }

    Ok(config)
}

/// Text plus the entity names to look for
fn read_input(args: &Args) -> Result<(String, Vec<String>)> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input at {}", path.display()))?,
        (None, None) => {
            let names = if args.entities.is_empty() {
                SAMPLE_ENTITIES.iter().map(|n| n.to_string()).collect()
            } else {
                args.entities.clone()
            };
            return Ok((SAMPLE_TEXT.to_string(), names));
        }
    };

    Ok((text, args.entities.clone()))
}

fn print_plan(plan: &Plan, document: &Document, args: &Args, config: &ChunkConfig) {
    println!(
        "=== {} tokens, max {} per chunk, padding {} ===\n",
        document.len(),
        config.max_chunk_size,
        config.min_padding
    );

    let chunks = match plan {
        Plan::Chunked(chunks) => chunks,
        Plan::Infeasible(reason) => {
            println!("✗ No valid chunking: {}", reason);
            return;
        }
    };

    if chunks.is_empty() {
        println!("No entities found, nothing to chunk");
        return;
    }

    for (i, chunk) in chunks.iter().enumerate() {
        let text = chunk.text(document);
        let text = if args.keep_markers {
            text.to_string()
        } else {
            config.delimiters.strip(text)
        };

        println!(
            "Chunk {} [{}..{}]: {}",
            i + 1,
            chunk.position.start,
            chunk.position.end,
            text
        );
        for entity in &chunk.entities {
            println!(
                "  - {} @ {}..{}",
                entity.name, entity.position.start, entity.position.end
            );
        }
    }

    println!("\n✓ {} chunks", chunks.len());
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
///
/// `ENTITY_CHUNKER_LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    match std::env::var("ENTITY_CHUNKER_LOG_FORMAT").as_deref() {
        Ok("json") => {
            let _ = registry.with(fmt_layer.json().flatten_event(true)).try_init();
        }
        _ => {
            let _ = registry.with(fmt_layer.compact()).try_init();
        }
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kindeck_anki::{AnkiConnectClient, DeckWriter, NoteModel};
use kindeck_config::Config;
use kindeck_index::{IndexBuilder, Vocabdb, Vocabulary, VocabularyIndex};
use kindeck_lang_english::PhrasalVerbTransform;
use kindeck_translate::WordReferenceTranslator;

/// Build an Anki deck from a Kindle vocabulary database or a word list.
#[derive(Parser, Debug)]
#[command(name = "kindeck", version, about)]
struct Cli {
    /// Vocabulary input file (.db or .csv)
    #[arg(long, default_value = "vocab.db")]
    input: PathBuf,

    /// Book to pick from a Kindle database; omit to list available books
    #[arg(long)]
    book_id: Option<String>,

    /// Vocabulary index location
    #[arg(long, default_value = "vindex.db")]
    index: PathBuf,

    /// Anki deck name; defaults to the book title
    #[arg(long)]
    deck: Option<String>,

    /// Language the vocabulary was read in
    #[arg(long, default_value = "en")]
    from_lang: String,

    /// Language to translate the vocabulary into
    #[arg(long, default_value = "es")]
    to_lang: String,

    /// Drop the existing index and start over
    #[arg(long)]
    clear_index: bool,

    /// Re-translate words already in the index
    #[arg(long)]
    force_update: bool,

    /// Build the index but do not push anything to Anki
    #[arg(long)]
    skip_anki: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::new();

    let (vocabulary, book_title) = match load_vocabulary(&cli)? {
        Some(loaded) => loaded,
        // Book listing mode already printed what the user asked for.
        None => return Ok(()),
    };
    tracing::info!(words = vocabulary.len(), "vocabulary loaded");

    if cli.clear_index && cli.index.exists() {
        std::fs::remove_file(&cli.index)
            .with_context(|| format!("could not clear index {:?}", cli.index))?;
    }
    let index = VocabularyIndex::open(&cli.index, &cli.from_lang, &cli.to_lang)?;

    let translator =
        WordReferenceTranslator::new(&config.http, cli.to_lang.clone(), cli.force_update)?;
    let mut builder =
        IndexBuilder::new(cli.from_lang.clone(), cli.to_lang.clone())
            .with_translator(Box::new(translator));
    if cli.from_lang == "en" {
        builder = builder.with_transform(Box::new(PhrasalVerbTransform));
    }

    let stats = builder.build(&vocabulary, &index).await?;
    tracing::info!(
        indexed = stats.indexed,
        reused = stats.reused,
        untranslated = stats.untranslated,
        "index built"
    );

    if cli.skip_anki {
        return Ok(());
    }

    let deck = cli
        .deck
        .clone()
        .or(book_title)
        .map(|name| format!("Kindle Vocabulary - {name}"))
        .unwrap_or_else(|| "Kindle Vocabulary".to_string());

    let writer = DeckWriter::new(
        AnkiConnectClient::new(config.anki.url.clone()),
        NoteModel::default_kindle(&config.anki.model),
        deck,
    );
    writer.prepare().await?;
    let outcome = writer.push(&index.read_entries()?).await?;

    println!(
        "Added {} notes ({} already present, {} untranslated)",
        outcome.added, outcome.duplicates, outcome.untranslated
    );
    Ok(())
}

/// Read the vocabulary from the input file. Returns `None` when the run was
/// just a book listing.
fn load_vocabulary(cli: &Cli) -> Result<Option<(Vocabulary, Option<String>)>> {
    if !cli.input.is_file() {
        bail!("could not open vocabulary file {:?}", cli.input);
    }

    match extension(&cli.input) {
        Some("csv") => Ok(Some((Vocabulary::from_csv_path(&cli.input)?, None))),
        Some("db") => {
            let db = Vocabdb::open(&cli.input)?;
            let Some(book_id) = cli.book_id.as_deref() else {
                list_books(&db)?;
                return Ok(None);
            };
            let book = db.book(book_id)?;
            let vocabulary = Vocabulary::from_vocabdb(&db, book_id, &cli.from_lang)?;
            Ok(Some((vocabulary, book.title)))
        }
        _ => bail!("unexpected input file type, expected .db or .csv"),
    }
}

fn list_books(db: &Vocabdb) -> Result<()> {
    println!("No book id given, listing available books:");
    for book in db.books()? {
        println!(
            "id: {}, title: {}",
            book.id,
            book.title.as_deref().unwrap_or("(untitled)")
        );
    }
    Ok(())
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

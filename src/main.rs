//! Interactive query REPL: loads the URL table, lexicon, and index file
//! named on the command line, then answers one query per line from stdin
//! until EOF.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;
use std::time::Instant;

use invquery::collaborators::{
    DocumentStore, IndexFile, InMemoryDocumentStore, Lexicon, SqliteDocumentStore, UrlTable,
};
use invquery::{Dispatcher, EngineConfig};

/// Conventional sqlite document-store filename looked up next to the index
/// file. The CLI's 3-arg surface (urlTableFile, lexiconFile, indexFile) has
/// no slot for a fourth path, so this is the default location a builder is
/// expected to place the `"sqlite"` backend the original names; a missing
/// or unopenable file falls back to an empty in-memory store so the REPL
/// still runs, just without snippets.
const DOCUMENT_STORE_FILENAME: &str = "documents.sqlite";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!(
            "Argument error: you need to provide pathToUrlTable, pathToLexicon, and pathToInvertedIndex"
        );
        process::exit(1);
    }

    let url_table_path = &args[1];
    let lexicon_path = &args[2];
    let index_path = &args[3];

    println!("Loading urlTable...");
    let begin = Instant::now();
    let url_table = UrlTable::load(url_table_path).unwrap_or_else(|e| {
        eprintln!("failed to load urlTable: {e}");
        process::exit(1);
    });
    log::info!(
        "{} entries loaded to urlTable. Elapsed: {:.2}s.",
        url_table.size(),
        begin.elapsed().as_secs_f32()
    );

    println!("Loading lexicon...");
    let begin = Instant::now();
    let lexicon = Lexicon::load(lexicon_path).unwrap_or_else(|e| {
        eprintln!("failed to load lexicon: {e}");
        process::exit(1);
    });
    log::info!(
        "{} entries loaded to lexicon. Elapsed: {:.2}s.",
        lexicon.len(),
        begin.elapsed().as_secs_f32()
    );

    let index_file = IndexFile::open(index_path).unwrap_or_else(|e| {
        eprintln!("failed to open index file {index_path}: {e}");
        process::exit(1);
    });

    let document_store_path = Path::new(index_path)
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DOCUMENT_STORE_FILENAME);
    // rusqlite::Connection::open happily creates an empty database file, so
    // gate on existence first rather than letting `open` "succeed" against
    // a file with no `documents` table and fail later on every query.
    let document_store: Box<dyn DocumentStore> = if document_store_path.exists() {
        match SqliteDocumentStore::open(&document_store_path) {
            Ok(store) => {
                log::info!(
                    "document store opened at {}",
                    document_store_path.display()
                );
                Box::new(store)
            }
            Err(e) => {
                log::warn!(
                    "failed to open document store at {} ({e}); snippets unavailable this run",
                    document_store_path.display()
                );
                Box::new(InMemoryDocumentStore::new(Vec::new()))
            }
        }
    } else {
        log::info!(
            "no document store at {}; snippets unavailable this run",
            document_store_path.display()
        );
        Box::new(InMemoryDocumentStore::new(Vec::new()))
    };

    let dispatcher = Dispatcher::new(
        lexicon,
        url_table,
        index_file,
        document_store,
        EngineConfig::default(),
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("\n====================\n\nPlease enter your query: ");
        stdout.flush().ok();

        let mut line = String::new();
        let bytes_read = stdin.lock().read_line(&mut line).unwrap_or(0);
        if bytes_read == 0 {
            break;
        }
        let query = line.trim_end_matches(['\n', '\r']);
        if query.is_empty() {
            continue;
        }

        println!("\nSearching '{query}'...\n");
        log::debug!("dispatching query: {query:?}");

        match dispatcher.execute(query) {
            Ok(hits) => {
                println!("{} results found. Most relevant ones:\n", hits.len());
                for (rank, hit) in hits.iter().enumerate() {
                    println!("{}.\tLink: {}", rank + 1, hit.url);
                    println!("\tRelevance score: {}", hit.score);
                    match &hit.snippet {
                        Some(s) => println!("\tSnippet: ...{s}...\n"),
                        None => println!("\tSnippet: (unavailable)\n"),
                    }
                }
            }
            Err(e) => {
                log::warn!("query {query:?} failed: {e}");
                eprintln!("query failed: {e}");
            }
        }
    }
}

//! # fridge — household inventory tracker
//!
//! Composition root that wires all adapters together and runs one command.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialize logging
//! - Construct the file-backed persistence, HTTP client and virtual camera
//! - Construct application services, injecting adapters via port traits
//! - Dispatch the requested subcommand
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fridge_adapter_http_reqwest::ReqwestHttpClient;
use fridge_adapter_storage_fs::FileKeyValueStore;
use fridge_adapter_virtual::VirtualCamera;
use fridge_app::scanner::ScanController;
use fridge_app::services::credential_store::CredentialStore;
use fridge_app::services::entry_service::{Draft, EntryService};
use fridge_app::services::inventory_store::{Consumed, InventoryStore};
use fridge_app::services::product_lookup::{LookupError, ProductLookup};
use fridge_domain::credential::ApiKey;
use fridge_domain::item::Item;
use fridge_domain::time;

use cli::{Cli, Command};
use config::Config;

type Persistence = Arc<FileKeyValueStore>;

const API_KEY_HINT: &str =
    "no API key configured; run `fridge set-api-key <KEY>` (free keys at https://upcdatabase.org)";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.logging.filter);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(cli.command, &config));
    // A blocking stdin read left behind by the scanner cannot be cancelled.
    runtime.shutdown_background();
    result
}

async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    // Persistence
    let persistence: Persistence = Arc::new(FileKeyValueStore::new(&config.storage.data_dir));
    let credentials = CredentialStore::new(Arc::clone(&persistence));
    let mut store = InventoryStore::open(Arc::clone(&persistence))?;

    // Lookup
    let http = ReqwestHttpClient::new(config.lookup.timeout())?;
    let lookup = ProductLookup::with_base_url(http.clone(), config.lookup.base_url.clone());
    let api_key = credentials.load()?;
    let entries = EntryService::new(lookup, api_key.clone());

    tracing::debug!(
        data_dir = %persistence.dir().display(),
        items = store.len(),
        "fridge ready"
    );

    match command {
        Command::List {
            search,
            sort_by_expiration,
        } => list(&store, &search, sort_by_expiration),
        Command::Add {
            barcode,
            title,
            quantity,
            expires,
        } => {
            let mut draft = entries.begin_manual_entry();
            let item = draft.item_mut();
            item.barcode = barcode;
            item.title = title;
            item.quantity = quantity;
            if let Some(day) = expires {
                item.expiration_date = time::start_of_day(day);
            }
            let id = entries.commit(&mut store, draft)?;
            println!("{id}");
        }
        Command::Edit {
            id,
            barcode,
            title,
            quantity,
            expires,
        } => {
            let mut draft = entries
                .begin_edit(&store, id)
                .with_context(|| format!("no item with id {id}"))?;
            let item = draft.item_mut();
            if let Some(barcode) = barcode {
                item.barcode = barcode;
            }
            if let Some(title) = title {
                item.title = title;
            }
            if let Some(quantity) = quantity {
                item.quantity = quantity;
            }
            if let Some(day) = expires {
                item.expiration_date = time::start_of_day(day);
            }
            entries.commit(&mut store, draft)?;
            if let Some(item) = store.get(id) {
                print_item(item);
            }
        }
        Command::Scan {
            title,
            quantity,
            expires,
        } => {
            if !entries.has_api_key() && title.is_none() {
                eprintln!("{API_KEY_HINT}");
            }
            scan(&entries, &mut store, title, quantity, expires).await?;
        }
        Command::Lookup { barcode } => {
            let lookup = ProductLookup::with_base_url(http, config.lookup.base_url.clone());
            match lookup.lookup(&barcode, api_key.as_ref()).await {
                Ok(title) => println!("{title}"),
                Err(LookupError::MissingCredential) => anyhow::bail!(API_KEY_HINT),
                Err(err) => return Err(err).context(format!("looking up {barcode}")),
            }
        }
        Command::Consume { id, amount } => match store.consume(id, amount)? {
            Consumed::Remaining(left) => println!("{left} left"),
            Consumed::Removed => println!("used up, removed"),
            Consumed::Missing => anyhow::bail!("no item with id {id}"),
        },
        Command::Delete { id } => {
            if store.get(id).is_none() {
                anyhow::bail!("no item with id {id}");
            }
            store.delete(id)?;
        }
        Command::SetApiKey { key } => {
            let key = ApiKey::new(key)?;
            credentials.save(&key)?;
        }
    }

    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("ignoring invalid log filter {filter:?}: {err}");
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list(store: &InventoryStore<Persistence>, search: &str, sort_by_expiration: bool) {
    let items = store.query(search, sort_by_expiration);
    if items.is_empty() {
        if store.is_empty() {
            eprintln!("Nothing in your fridge yet! Add something with `fridge scan` or `fridge add`.");
        } else {
            eprintln!("No item matches {search:?}.");
        }
        return;
    }
    for item in items {
        print_item(item);
    }
}

fn print_item(item: &Item) {
    let expired = if item.expiration_date < time::now() {
        " (expired)"
    } else {
        ""
    };
    println!(
        "{}  {:>3}  {}{}  {}  {}",
        item.id,
        item.quantity,
        item.expiration_date.date_naive(),
        expired,
        item.title,
        item.barcode,
    );
}

async fn scan(
    entries: &EntryService<ReqwestHttpClient>,
    store: &mut InventoryStore<Persistence>,
    title: Option<String>,
    quantity: i64,
    expires: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let camera = VirtualCamera::from_reader(tokio::io::BufReader::new(tokio::io::stdin()));
    let mut scanner = ScanController::new(camera);
    scanner.start()?;
    eprintln!("Scanning: enter a barcode (EAN-13, EAN-8 or CODE-128) per line, Ctrl-D to cancel.");

    let Some(barcode) = scanner.next_code().await else {
        eprintln!("Scan cancelled.");
        return Ok(());
    };
    eprintln!("Scanned {barcode}");

    let mut draft = entries.begin_from_scan(&barcode);
    fill_draft(&mut draft, title, quantity, expires);
    let found = draft.await_lookup().await;
    if !found && draft.item().title.is_empty() {
        eprintln!("No title found for {barcode}; saving it untitled.");
    }

    let id = entries.commit(store, draft)?;
    println!("{id}");
    Ok(())
}

/// Fields typed by the user go in before the lookup settles, so a late title
/// never replaces one given on the command line.
fn fill_draft(draft: &mut Draft, title: Option<String>, quantity: i64, expires: Option<NaiveDate>) {
    let item = draft.item_mut();
    if let Some(title) = title {
        item.title = title;
    }
    item.quantity = quantity;
    if let Some(day) = expires {
        item.expiration_date = time::start_of_day(day);
    }
}

//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use fridge_domain::id::ItemId;

/// Household fridge inventory.
#[derive(Debug, Parser)]
#[command(name = "fridge", version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, env = "FRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List stored items.
    List {
        /// Only show items whose title contains this text (case-insensitive).
        #[arg(long, short, default_value = "")]
        search: String,
        /// Show the items expiring soonest first.
        #[arg(long)]
        sort_by_expiration: bool,
    },
    /// Add an item by hand.
    Add {
        #[arg(long, default_value = "")]
        barcode: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        /// Expiration day, `YYYY-MM-DD`. Defaults to today.
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    /// Change fields of a stored item.
    Edit {
        id: ItemId,
        #[arg(long)]
        barcode: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    /// Read barcodes from stdin (one frame per line), look up the first one
    /// recognized, and store it.
    Scan {
        /// Use this title instead of the looked-up one.
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    /// Print the product title for a barcode without storing anything.
    Lookup { barcode: String },
    /// Use up some of an item; it is removed when nothing is left.
    Consume {
        id: ItemId,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        amount: u32,
    },
    /// Remove an item.
    Delete { id: ItemId },
    /// Store the upcdatabase.org API key used for lookups.
    SetApiKey { key: String },
}

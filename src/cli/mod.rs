// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the episode-search command-line interface.
//!
//! `search` runs a session against a live backend and renders the results,
//! `open` does the same from a shared URL query string. `url` and `request`
//! expose the pure codecs so a link or backend call can be inspected without
//! any network traffic.

pub mod display;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use episode_search::SearchQuery;

#[derive(Parser)]
#[command(
    name = "episode-search",
    about = "Search session controller for the episode archive",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// The three inputs of a search box.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Text to search for
    pub text: String,

    /// Match the text as one contiguous phrase
    #[arg(long)]
    pub exact_phrase: bool,

    /// Search episode titles only
    #[arg(long = "title")]
    pub search_title: bool,
}

impl QueryArgs {
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery::new(self.text.clone())
            .with_exact_phrase(self.exact_phrase)
            .with_search_title(self.search_title)
    }
}

/// Where the backend is and how long to wait for it.
#[derive(Args, Debug, Clone, Default)]
pub struct BackendArgs {
    /// Backend root (overrides config file and EPISODE_SEARCH_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Print highlight fragments as the backend sent them
    #[arg(long)]
    pub raw_html: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the archive and display results
    Search {
        #[command(flatten)]
        query: QueryArgs,

        /// Extra pages to load after the first
        ///
        /// The first page holds up to 50 episodes, each extra page up to 10.
        /// Stops early once every match is shown.
        #[arg(short, long, default_value = "0")]
        pages: usize,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Mount from a shared URL query string and run its search
    Open {
        /// Query string, with or without the leading `?`
        query_string: String,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Convert between search inputs and shareable query strings
    Url {
        #[command(subcommand)]
        command: UrlCommands,
    },

    /// Print the backend URL a search would request
    Request {
        #[command(flatten)]
        query: QueryArgs,

        /// Backend root
        #[arg(long)]
        base_url: Option<String>,

        /// Offset of a load-more request (uses the load-more page size)
        #[arg(long)]
        offset: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum UrlCommands {
    /// Encode search inputs as a query string
    Encode {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Decode a query string into search inputs (printed as JSON)
    Decode {
        /// Query string, with or without the leading `?`
        query_string: String,
    },
}

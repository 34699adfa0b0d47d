//! goo: command-line client for the goo optimistic oracle realm on gno.land.
//!
//! Requesters ask questions, proposers answer them against a bond, disputers
//! challenge answers, and token holders settle disputes with a commit-reveal
//! vote. Signing and broadcasting are done by the external `gnokey` tool; goo
//! builds the calls, decodes what the realm returns, and keeps each voter's
//! secret (value + salt) on disk between commit and reveal.
//!
//! # Crate Structure
//!
//! - [`qeval`]: decoder for `vm/qeval` response text (fields, grammar, records)
//! - [`vote`]: commitment hashing and the local vote store
//! - [`core`]: errors, config, state layout, the `gnokey` executor, output
//! - [`plugins`]: one module per subcommand, plus the AI research assistant
//!
//! # Examples
//!
//! ```bash
//! goo config init
//! goo request create --question "ETH/USD on 2025-10-27 12:00 UTC?" --deadline 2025-10-28T12:00:00Z
//! goo propose value 0000001 3500
//! goo vote commit 0000001 3500
//! goo vote reveal 0000001
//! ```

pub mod core;
pub mod plugins;
pub mod qeval;
pub mod vote;

use crate::core::{
    config::Config, error::GooError, executor::GnokeyExecutor, logging, store::Store,
};
use crate::plugins::{admin, config_cli, dispute, propose, query, request, vote as vote_cli};
use crate::vote::VoteStore;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
#[clap(
    name = "goo",
    version = env!("CARGO_PKG_VERSION"),
    about = "CLI for the goo optimistic oracle"
)]
struct Cli {
    /// Key name to sign with (overrides `keyname` from the config).
    #[clap(long, short, global = true)]
    key: Option<String>,
    /// Show the gnokey commands and their raw output.
    #[clap(long, short, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create and inspect data requests
    Request(request::RequestCli),

    /// Propose values for requests
    Propose(propose::ProposeCli),

    /// Create, inspect, and resolve disputes
    Dispute(dispute::DisputeCli),

    /// Vote tokens and commit-reveal voting
    Vote(vote_cli::VoteCli),

    /// Read-only oracle queries
    Query(query::QueryCli),

    /// Oracle administration
    Admin(admin::AdminCli),

    /// Manage the CLI configuration
    Config(config_cli::ConfigCli),
}

pub fn run() -> Result<(), GooError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let store = Store::resolve()?;
    debug!(root = %store.root.display(), "state root");

    if let Command::Config(config) = cli.command {
        return config_cli::run_config_cli(&store, config);
    }

    let cfg = Config::load(&store).with_key_override(cli.key.as_deref());
    let realm = GnokeyExecutor::new(&cfg, cli.verbose);

    match cli.command {
        Command::Request(c) => request::run_request_cli(&realm, c, cli.verbose),
        Command::Propose(c) => propose::run_propose_cli(&realm, &cfg, c, cli.verbose),
        Command::Dispute(c) => dispute::run_dispute_cli(&realm, c, cli.verbose),
        Command::Vote(c) => vote_cli::run_vote_cli(&realm, &VoteStore::open(&store), c),
        Command::Query(c) => query::run_query_cli(&realm, c),
        Command::Admin(c) => admin::run_admin_cli(&realm, c),
        Command::Config(_) => Ok(()),
    }
}

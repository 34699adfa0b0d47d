use crate::core::error::GooError;
use crate::core::executor::Realm;
use crate::core::output;
use crate::plugins::propose::BOND_GETTER;
use crate::qeval::records::{self, DisputeRecord};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "dispute", about = "Create, inspect, and resolve disputes")]
pub struct DisputeCli {
    #[clap(subcommand)]
    pub command: DisputeCommand,
}

#[derive(Subcommand, Debug)]
pub enum DisputeCommand {
    /// Challenge a proposed value; the bond is sent with the transaction.
    Create { request_id: String },
    /// Show vote counts and status of a dispute.
    Get { request_id: String },
    /// Finalize a dispute after the reveal period.
    Resolve { request_id: String },
}

/// Bond sent with the dispute.
pub fn create_dispute(realm: &dyn Realm, request_id: &str) -> Result<i64, GooError> {
    output::info("Querying required bond amount from the realm...");
    let bond = realm.query_int64(BOND_GETTER)?;
    output::info(&format!("Bond required: {}", output::format_ugnot(bond)));
    realm.call(
        "DisputeData",
        &[request_id.to_string()],
        Some(&format!("{}ugnot", bond)),
    )?;
    Ok(bond)
}

pub fn get_dispute(realm: &dyn Realm, request_id: &str) -> Result<DisputeRecord, GooError> {
    let raw = realm.query("GetDispute", &[request_id.to_string()])?;
    records::decode_dispute(&raw)
}

fn show<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}

pub fn display_dispute(dispute: &DisputeRecord) {
    let id = dispute.request_id.as_deref().unwrap_or("?");
    output::section(&format!("Dispute for Request {}", id));
    println!();
    println!("Status:");
    output::key_value("  Request ID", id);
    if dispute.is_resolved == Some(true) {
        output::key_value("  Status", "Resolved");
        output::key_value("  Winning Value", show(dispute.winning_value));
    } else {
        output::key_value("  Status", "Active");
    }
    output::key_value("  Vote End", show(dispute.end_time.as_ref()));
    output::key_value("  Reveal End", show(dispute.end_reveal_time.as_ref()));

    println!();
    println!("Voting:");
    output::key_value("  Total Votes", show(dispute.vote_count));
    output::key_value("  Revealed Votes", show(dispute.resolved_vote_count));
    output::key_value("  Unrevealed Votes", show(dispute.unrevealed()));
    println!();
}

pub fn run_dispute_cli(realm: &dyn Realm, cli: DisputeCli, verbose: bool) -> Result<(), GooError> {
    match cli.command {
        DisputeCommand::Create { request_id } => {
            let bond = create_dispute(realm, &request_id)?;
            output::success("Dispute created successfully!");
            output::info(&format!("Request ID: {}", request_id));
            output::info("Voting period has started");
            output::info(&format!("Bond sent: {}", output::format_ugnot(bond)));
        }
        DisputeCommand::Get { request_id } => {
            let raw = realm.query("GetDispute", &[request_id.clone()])?;
            match records::decode_dispute(&raw) {
                Ok(dispute) => display_dispute(&dispute),
                Err(e) => {
                    if verbose {
                        output::error(&format!("Failed to decode dispute: {}", e));
                        println!("{}", raw);
                    }
                    return Err(e);
                }
            }
        }
        DisputeCommand::Resolve { request_id } => {
            realm.call("ResolveDispute", &[request_id.clone()], None)?;
            output::success("Dispute resolution submitted!");
            output::info(&format!("Request ID: {}", request_id));
        }
    }
    Ok(())
}

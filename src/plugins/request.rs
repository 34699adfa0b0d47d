use crate::core::error::GooError;
use crate::core::executor::Realm;
use crate::core::{output, time};
use crate::qeval::records::{self, DataRequestRecord, RequestState};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

pub const DEFAULT_REWARD_GETTER: &str = "GetRequesterReward";

#[derive(Parser, Debug)]
#[clap(name = "request", about = "Create, query, and manage data requests")]
pub struct RequestCli {
    #[clap(subcommand)]
    pub command: RequestCommand,
}

#[derive(Subcommand, Debug)]
pub enum RequestCommand {
    /// Create a new data request.
    Create {
        /// Question or ancillary data for the request.
        #[clap(long)]
        question: String,
        /// Deadline in RFC3339 format (e.g. 2025-10-28T12:00:00Z).
        #[clap(long)]
        deadline: String,
        /// Yes/no question (default: numeric).
        #[clap(long)]
        yesno: bool,
        /// Reward in ugnot (default: queried from the realm).
        #[clap(long)]
        reward: Option<i64>,
    },
    /// Show details of a request.
    Get { request_id: String },
    /// Take back the reward of a request that was not fulfilled before its deadline.
    RetrieveFund { request_id: String },
}

/// Reward actually sent with the request.
pub fn create_request(
    realm: &dyn Realm,
    question: &str,
    deadline: DateTime<Utc>,
    yes_no: bool,
    reward: Option<i64>,
) -> Result<i64, GooError> {
    if question.trim().is_empty() {
        return Err(GooError::ValidationError("question cannot be empty".to_string()));
    }
    let reward = match reward {
        Some(r) if r < 0 => {
            return Err(GooError::ValidationError(format!("reward cannot be negative: {}", r)));
        }
        Some(r) if r > 0 => r,
        _ => {
            output::info("Querying default requester reward from the realm...");
            let r = realm.query_int64(DEFAULT_REWARD_GETTER)?;
            output::info(&format!("Default reward: {}", output::format_ugnot(r)));
            r
        }
    };
    let args = vec![
        question.to_string(),
        yes_no.to_string(),
        deadline.timestamp().to_string(),
    ];
    realm.call("RequestData", &args, Some(&format!("{}ugnot", reward)))?;
    Ok(reward)
}

pub fn get_request(realm: &dyn Realm, request_id: &str) -> Result<(DataRequestRecord, String), GooError> {
    let raw = realm.query("GetRequest", &[request_id.to_string()])?;
    let record = records::decode_data_request(&raw)?;
    Ok((record, raw))
}

fn or_unknown<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "(unreadable)".to_string())
}

pub fn display_request(req: &DataRequestRecord) {
    let id = req.id.as_deref().unwrap_or("?");
    output::section(&format!("Request {}", id));
    println!();
    println!("Basic Information:");
    output::key_value("  Request ID", id);
    output::key_value("  State", req.state);
    output::key_value("  Creator", or_unknown(&req.creator));
    output::key_value("  Question", or_unknown(&req.question));
    let kind = match req.is_yes_no {
        Some(true) => "Yes/No Question",
        Some(false) => "Numeric",
        None => "(unreadable)",
    };
    output::key_value("  Type", kind);
    if let Some(deadline) = &req.deadline {
        output::key_value("  Deadline", deadline);
    }

    println!();
    println!("Proposal Information:");
    if req.has_proposer() {
        output::key_value("  Proposer", or_unknown(&req.proposer));
        output::key_value("  Proposed Value", or_unknown(&req.proposed_value));
        if let Some(bond) = req.proposer_bond {
            output::key_value("  Proposer Bond", output::format_ugnot(bond));
        }
    } else {
        output::key_value("  Status", "No proposal yet");
    }

    println!();
    println!("Dispute Information:");
    if req.has_disputer() {
        output::key_value("  Disputer", or_unknown(&req.disputer));
        if let Some(bond) = req.disputer_bond {
            output::key_value("  Disputer Bond", output::format_ugnot(bond));
        }
    } else {
        output::key_value("  Status", "Not disputed");
    }

    if req.state == RequestState::Resolved {
        println!();
        println!("Resolution:");
        output::key_value("  Winning Value", or_unknown(&req.winning_value));
    }
    println!();
}

pub fn run_request_cli(realm: &dyn Realm, cli: RequestCli, verbose: bool) -> Result<(), GooError> {
    match cli.command {
        RequestCommand::Create {
            question,
            deadline,
            yesno,
            reward,
        } => {
            let deadline = time::parse_deadline(&deadline)?;
            let sent = create_request(realm, &question, deadline, yesno, reward)?;
            output::success("Request created successfully!");
            output::info(&format!("Question: {}", question));
            output::info(if yesno { "Type: yes/no question" } else { "Type: numeric" });
            output::info(&format!("Deadline: {}", deadline.to_rfc3339()));
            output::info(&format!("Reward sent: {}", output::format_ugnot(sent)));
        }
        RequestCommand::Get { request_id } => {
            let raw = realm.query("GetRequest", &[request_id.clone()])?;
            match records::decode_data_request(&raw) {
                Ok(record) => display_request(&record),
                Err(e) => {
                    if verbose {
                        output::error(&format!("Failed to decode request: {}", e));
                        println!("{}", raw);
                    }
                    return Err(e);
                }
            }
        }
        RequestCommand::RetrieveFund { request_id } => {
            realm.call("RequesterRetreiveFund", &[request_id.clone()], None)?;
            output::success("Fund retrieval transaction submitted!");
            output::info(&format!("Request ID: {}", request_id));
        }
    }
    Ok(())
}

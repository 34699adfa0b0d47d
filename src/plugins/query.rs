use crate::core::error::GooError;
use crate::core::executor::Realm;
use crate::core::output;
use crate::plugins::request;
use crate::qeval::records::{self, RequestState};
use clap::{Parser, Subcommand};
use tracing::debug;

/// Display name and getter of every oracle parameter.
pub const PARAMS: [(&str, &str); 6] = [
    ("Bond", "GetBond"),
    ("Resolution Time", "GetResolutionTime"),
    ("Requester Reward", "GetRequesterReward"),
    ("Dispute Duration", "GetDisputeDuration"),
    ("Reveal Duration", "GetRevealDuration"),
    ("Vote Token Price", "GetVoteTokenPrice"),
];

pub const REQUEST_IDS_GETTER: &str = "GetRequestIds";

#[derive(Parser, Debug)]
#[clap(name = "query", about = "Read-only oracle queries")]
pub struct QueryCli {
    #[clap(subcommand)]
    pub command: QueryCommand,
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Get the final result of a request (signed transaction).
    Result { request_id: String },
    /// Show all oracle parameters.
    Params,
    /// List request ids, optionally filtered by state.
    List {
        /// Requested, Proposed, Disputed or Resolved.
        #[clap(long)]
        state: Option<String>,
    },
}

#[derive(Debug)]
pub struct ParamValue {
    pub name: &'static str,
    pub getter: &'static str,
    pub value: Result<i64, GooError>,
}

/// Every parameter is queried even when an earlier one fails.
pub fn fetch_params(realm: &dyn Realm) -> Vec<ParamValue> {
    PARAMS
        .iter()
        .map(|&(name, getter)| ParamValue {
            name,
            getter,
            value: realm.query_int64(getter),
        })
        .collect()
}

pub fn list_request_ids(realm: &dyn Realm) -> Result<Vec<String>, GooError> {
    let raw = realm.query(REQUEST_IDS_GETTER, &[])?;
    records::decode_request_ids(&raw)
}

/// Ids whose request currently is in `state`. Undecodable requests are left out.
pub fn filter_by_state(realm: &dyn Realm, ids: Vec<String>, state: RequestState) -> Vec<String> {
    ids.into_iter()
        .filter(|id| match request::get_request(realm, id) {
            Ok((record, _)) => record.state == state,
            Err(e) => {
                debug!(request_id = %id, error = %e, "skipping request in state filter");
                false
            }
        })
        .collect()
}

fn parse_state(name: &str) -> Result<RequestState, GooError> {
    let normalized = {
        let lower = name.trim().to_ascii_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    };
    match RequestState::from_name(&normalized) {
        RequestState::Unknown => Err(GooError::ValidationError(format!(
            "unknown state '{}': expected Requested, Proposed, Disputed or Resolved",
            name
        ))),
        state => Ok(state),
    }
}

pub fn run_query_cli(realm: &dyn Realm, cli: QueryCli) -> Result<(), GooError> {
    match cli.command {
        QueryCommand::Result { request_id } => {
            // Needs realm context, so it goes out as a transaction.
            realm.call("RequestResult", &[request_id.clone()], None)?;
            output::success(&format!(
                "Result query for request {} executed successfully!",
                request_id
            ));
        }
        QueryCommand::Params => {
            output::section("Oracle Parameters");
            for param in fetch_params(realm) {
                match param.value {
                    Ok(v) => output::key_value(param.name, v),
                    Err(e) => output::error(&format!("Failed to query {}: {}", param.name, e)),
                }
            }
        }
        QueryCommand::List { state } => {
            let state = state.as_deref().map(parse_state).transpose()?;
            let ids = match list_request_ids(realm) {
                Ok(ids) => ids,
                Err(e) => {
                    debug!(error = %e, "request id list unavailable, falling back to Render");
                    let rendered = realm.query("Render", &[String::new()])?;
                    output::success("Oracle State:");
                    println!("{}", rendered);
                    output::warning("Could not read the request id list; showing the realm's Render output");
                    return Ok(());
                }
            };
            let ids = match state {
                Some(state) => {
                    output::info(&format!("Filtering by state: {}", state));
                    filter_by_state(realm, ids, state)
                }
                None => ids,
            };
            if ids.is_empty() {
                output::info("No requests found");
                return Ok(());
            }
            output::section(&format!("Requests ({})", ids.len()));
            for id in &ids {
                println!("  {}", id);
            }
        }
    }
    Ok(())
}

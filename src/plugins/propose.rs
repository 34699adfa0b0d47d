use crate::core::config::Config;
use crate::core::error::GooError;
use crate::core::executor::Realm;
use crate::core::output;
use crate::plugins::request;
use crate::plugins::research::{
    self, GeminiResearcher, ResearchAnswer, ResearchOutcome, Researcher,
};
use clap::{Parser, Subcommand};

pub const BOND_GETTER: &str = "GetBond";

#[derive(Parser, Debug)]
#[clap(name = "propose", about = "Propose values for requests")]
pub struct ProposeCli {
    #[clap(subcommand)]
    pub command: ProposeCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProposeCommand {
    /// Propose a value for a request; the bond is sent with the transaction.
    Value {
        request_id: String,
        /// Value to propose (omit with --search).
        value: Option<String>,
        /// Research the value with the AI assistant before proposing.
        #[clap(long)]
        search: bool,
    },
    /// Resolve a request that was not disputed once its resolution time is over.
    Resolve { request_id: String },
}

/// A researched value, ready to propose after confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    Value {
        question: String,
        is_yes_no: bool,
        /// On-chain form (`1`/`0` for yes/no questions).
        value: String,
        answer: ResearchAnswer,
    },
    FutureQuestion { why: String },
    InsufficientData { why: String },
}

/// Bond sent with the proposal.
pub fn propose_value(realm: &dyn Realm, request_id: &str, value: &str) -> Result<i64, GooError> {
    if value.trim().is_empty() {
        return Err(GooError::ValidationError("value cannot be empty".to_string()));
    }
    output::info("Querying required bond amount from the realm...");
    let bond = realm.query_int64(BOND_GETTER)?;
    output::info(&format!("Bond required: {}", output::format_ugnot(bond)));
    realm.call(
        "ProposeValue",
        &[request_id.to_string(), value.trim().to_string()],
        Some(&format!("{}ugnot", bond)),
    )?;
    Ok(bond)
}

/// Fetch the request's question and research an answer for it.
pub fn suggest_value(
    realm: &dyn Realm,
    researcher: &dyn Researcher,
    request_id: &str,
) -> Result<Suggestion, GooError> {
    let (record, _) = request::get_request(realm, request_id)?;
    let question = record
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| GooError::MalformedRecord(format!("request {} has no readable question", request_id)))?;
    let is_yes_no = record.is_yes_no.unwrap_or(false);

    match researcher.research(&question)? {
        ResearchOutcome::FutureQuestion { why } => Ok(Suggestion::FutureQuestion { why }),
        ResearchOutcome::InsufficientData { why } => Ok(Suggestion::InsufficientData { why }),
        ResearchOutcome::Answer(answer) => {
            let value = research::normalize_answer(&answer.value, is_yes_no)?;
            Ok(Suggestion::Value {
                question,
                is_yes_no,
                value,
                answer,
            })
        }
    }
}

fn display_suggestion(question: &str, is_yes_no: bool, value: &str, answer: &ResearchAnswer) {
    println!();
    println!("Question: {}", question);
    println!();
    if is_yes_no {
        println!("Answer: {} → {}", answer.value.trim(), value);
    } else {
        println!("Answer: {}", value);
    }
    println!();
    if !answer.why.trim().is_empty() {
        println!("Justification:");
        for line in output::wrap_text(&answer.why, 80) {
            println!("{}", line);
        }
        println!();
    }
    if !answer.sources.is_empty() {
        println!("Sources:");
        for (i, src) in answer.sources.iter().enumerate() {
            println!("  {}. {}", i + 1, src);
        }
        println!();
    }
}

/// Interactive research flow. `Ok(None)` when nothing should be proposed;
/// the reason has already been printed.
fn researched_value(
    realm: &dyn Realm,
    cfg: &Config,
    request_id: &str,
    verbose: bool,
) -> Result<Option<String>, GooError> {
    let researcher = GeminiResearcher::new(cfg.google_api_key.as_deref().unwrap_or(""), verbose)?;
    output::info(&format!("Fetching request details for ID: {}", request_id));

    let suggestion = match suggest_value(realm, &researcher, request_id) {
        Ok(s) => s,
        Err(e @ (GooError::ResearchError(_) | GooError::ValidationError(_))) => {
            output::error(&format!("AI research failed: {}", e));
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match suggestion {
        Suggestion::FutureQuestion { why } => {
            output::error("This question is about a future event");
            output::error("The oracle only answers verifiable questions");
            if verbose && !why.is_empty() {
                println!("{}", why);
            }
            Ok(None)
        }
        Suggestion::InsufficientData { why } => {
            output::warning("AI could not find sufficient data to answer this question");
            println!();
            println!("Reason:");
            println!("{}", why);
            Ok(None)
        }
        Suggestion::Value {
            question,
            is_yes_no,
            value,
            answer,
        } => {
            display_suggestion(&question, is_yes_no, &value, &answer);
            let reply = output::prompt("Propose this value? [y/N]: ")?;
            if !output::is_affirmative(&reply) {
                output::info("Cancelled");
                return Ok(None);
            }
            println!();
            Ok(Some(value))
        }
    }
}

pub fn run_propose_cli(
    realm: &dyn Realm,
    cfg: &Config,
    cli: ProposeCli,
    verbose: bool,
) -> Result<(), GooError> {
    match cli.command {
        ProposeCommand::Value {
            request_id,
            value,
            search,
        } => {
            let value = if search {
                match researched_value(realm, cfg, &request_id, verbose)? {
                    Some(v) => v,
                    None => return Ok(()),
                }
            } else {
                value.ok_or_else(|| {
                    GooError::ValidationError(
                        "value argument required (or use --search for an AI-researched proposal)"
                            .to_string(),
                    )
                })?
            };
            let bond = propose_value(realm, &request_id, &value)?;
            output::success("Value proposed successfully!");
            output::info(&format!("Request ID: {}", request_id));
            output::info(&format!("Proposed Value: {}", value));
            output::info(&format!("Bond sent: {}", output::format_ugnot(bond)));
        }
        ProposeCommand::Resolve { request_id } => {
            realm.call("ResolveRequest", &[request_id.clone()], None)?;
            output::success("Request resolution submitted!");
            output::info(&format!("Request ID: {}", request_id));
        }
    }
    Ok(())
}

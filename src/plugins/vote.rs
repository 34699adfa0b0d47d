use crate::core::error::GooError;
use crate::core::executor::Realm;
use crate::core::output;
use crate::qeval::records;
use crate::vote::commitment::{self, DEFAULT_SALT_BYTES, Salt};
use crate::vote::store::{self, VoteCommitment, VoteStore};
use clap::{Parser, Subcommand};
use tracing::debug;

pub const TOKEN_PRICE_GETTER: &str = "GetVoteTokenPrice";

#[derive(Parser, Debug)]
#[clap(name = "vote", about = "Buy vote tokens, commit and reveal votes")]
pub struct VoteCli {
    #[clap(subcommand)]
    pub command: VoteCommand,
}

#[derive(Subcommand, Debug)]
pub enum VoteCommand {
    /// Buy the initial vote token needed to take part in votes.
    BuyToken,
    /// Show your vote token balance.
    Balance,
    /// Commit a hashed vote during the voting period.
    Commit {
        request_id: String,
        value: String,
        /// Salt for the vote hash (random if omitted).
        #[clap(long)]
        salt: Option<String>,
    },
    /// Reveal a committed vote using the locally stored value and salt.
    Reveal { request_id: String },
    /// List locally stored vote commitments.
    List,
    /// Show one stored vote commitment.
    Show { request_id: String },
    /// Delete a stored vote commitment.
    Forget { request_id: String },
}

#[derive(Debug)]
pub struct CommitReceipt {
    pub hash: String,
    pub salt: Salt,
    /// True when no salt (or an empty one) was given and a random one was made.
    pub salt_generated: bool,
    /// Local save result; the on-chain commit already happened either way.
    pub saved: Result<VoteCommitment, GooError>,
}

/// Price paid for the token.
pub fn buy_token(realm: &dyn Realm) -> Result<i64, GooError> {
    let price = realm.query_int64(TOKEN_PRICE_GETTER)?;
    output::info(&format!("Vote token price: {}", output::format_ugnot(price)));
    realm.call("BuyInitialVoteToken", &[], Some(&format!("{}ugnot", price)))?;
    Ok(price)
}

pub fn commit_vote(
    realm: &dyn Realm,
    votes: &VoteStore,
    request_id: &str,
    value: &str,
    salt: Option<&str>,
) -> Result<CommitReceipt, GooError> {
    // Checked before the transaction so the secret can always be stored.
    store::validate_request_id(request_id)?;
    if value.trim().is_empty() {
        return Err(GooError::ValidationError("vote value cannot be empty".to_string()));
    }
    let given = salt.filter(|s| !s.is_empty());
    let salt_generated = given.is_none();
    let salt = match given {
        Some(s) => Salt {
            value: s.to_string(),
            strong: true,
        },
        None => commitment::generate_salt(DEFAULT_SALT_BYTES),
    };
    let hash = commitment::commit(value, &salt.value);
    realm.call("VoteOnDispute", &[request_id.to_string(), hash.clone()], None)?;
    let saved = votes.save(request_id, value, &salt.value, &hash);
    Ok(CommitReceipt {
        hash,
        salt,
        salt_generated,
        saved,
    })
}

/// Check the stored secret against its hash, then reveal it. Returns the value.
/// Records without a stored hash are revealed unchecked.
pub fn reveal_vote(realm: &dyn Realm, votes: &VoteStore, request_id: &str) -> Result<String, GooError> {
    let (value, salt) = votes.load(request_id)?;
    let record = votes.get(request_id)?;
    if record.hash.is_empty() {
        debug!(request_id, "no stored hash, revealing without local check");
    } else if !commitment::verify(&record.hash, &value, &salt) {
        return Err(GooError::HashMismatch);
    }
    realm.call(
        "RevealVote",
        &[request_id.to_string(), value.clone(), salt],
        None,
    )?;
    Ok(value)
}

fn display_commitment(record: &VoteCommitment) {
    output::key_value("Request ID", &record.request_id);
    output::key_value("Value", &record.value);
    output::key_value("Salt", &record.salt);
    output::key_value("Hash", &record.hash);
    output::key_value("Committed", &record.timestamp);
}

pub fn run_vote_cli(realm: &dyn Realm, votes: &VoteStore, cli: VoteCli) -> Result<(), GooError> {
    match cli.command {
        VoteCommand::BuyToken => {
            let price = buy_token(realm)?;
            output::success("Vote token purchase submitted!");
            output::info(&format!("Paid: {}", output::format_ugnot(price)));
        }
        VoteCommand::Balance => {
            let raw = realm.query("BalanceOfVoteToken", &[])?;
            match records::decode_int64(&raw) {
                Ok(balance) => output::key_value("Vote token balance", balance),
                Err(_) => {
                    output::success("Vote token balance:");
                    println!("{}", raw);
                }
            }
        }
        VoteCommand::Commit {
            request_id,
            value,
            salt,
        } => {
            let receipt = commit_vote(realm, votes, &request_id, &value, salt.as_deref())?;
            if receipt.salt_generated {
                output::info(&format!("Auto-generated salt: {}", receipt.salt.value));
            }
            if !receipt.salt.strong {
                output::warning("System entropy was unavailable: the salt is time-based and guessable");
            }
            output::success("Vote committed successfully!");
            output::info(&format!("Request ID: {}", request_id));
            output::info(&format!("Value: {}", value));
            output::info(&format!("Hash: {}", receipt.hash));
            match receipt.saved {
                Ok(_) => output::info(&format!(
                    "Vote data saved to {} for the reveal phase",
                    votes.path_for(&request_id).display()
                )),
                Err(e) => {
                    output::warning(&format!("Failed to save vote locally: {}", e));
                    output::warning(&format!(
                        "Keep this salt to reveal later: {}",
                        receipt.salt.value
                    ));
                }
            }
        }
        VoteCommand::Reveal { request_id } => {
            let value = reveal_vote(realm, votes, &request_id)?;
            output::success("Vote revealed successfully!");
            output::info(&format!("Request ID: {}", request_id));
            output::info(&format!("Value: {}", value));
        }
        VoteCommand::List => {
            let records = votes.list()?;
            if records.is_empty() {
                output::info(&format!("No stored votes in {}", votes.dir().display()));
                return Ok(());
            }
            output::section("Stored Votes");
            for record in &records {
                println!(
                    "  {:<12} value={:<10} {}  {}",
                    record.request_id,
                    output::truncate(&record.value, 10),
                    record.timestamp,
                    output::truncate(&record.hash, 16)
                );
            }
        }
        VoteCommand::Show { request_id } => {
            let record = votes.get(&request_id)?;
            output::section(&format!("Vote for Request {}", request_id));
            display_commitment(&record);
        }
        VoteCommand::Forget { request_id } => {
            votes.delete(&request_id)?;
            output::success(&format!("Deleted local vote data for request {}", request_id));
        }
    }
    Ok(())
}

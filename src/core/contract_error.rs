//! Translation of raw realm panics into operator-friendly errors.

use crate::core::error::GooError;

/// Substring of a realm message → friendly text. First match wins, so longer,
/// more specific patterns sit above shorter ones.
const ERROR_MAPPINGS: &[(&str, &str)] = &[
    // requests
    ("Ancillary data cannot be empty", "Question/ancillary data is required"),
    ("Deadline must be at least 24 hours in the future", "Deadline must be at least 24 hours from now"),
    ("Incorrect reward amount sent", "Incorrect reward amount (check with 'goo query params')"),
    ("Request with this ID does not exist", "Request not found - invalid request ID"),
    ("Request is not in 'Requested' state", "Request is not available for proposals (may be already proposed, disputed, or resolved)"),
    ("Deadline for proposal has passed", "Proposal deadline has passed"),
    ("Request has not been proposed yet", "No proposal submitted for this request yet"),
    ("Request is already resolved", "Request is already resolved"),
    ("cannot retreive fund as requests fulfilled", "Cannot retrieve funds - request has been fulfilled"),
    ("Only the creator of the request can retrieve the fund", "Only the request creator can retrieve the fund"),
    ("Cannot retrieve fund before the deadline", "Cannot retrieve fund - deadline not reached yet"),
    // proposals and disputes
    ("Proposed value must be 0 or 1 for yes/no questions", "For yes/no questions, value must be 0 (no) or 1 (yes)"),
    ("Incorrect bond amount sent", "Incorrect bond amount (check with 'goo query params')"),
    ("Resolution period has not ended yet", "Cannot resolve yet - resolution period still active"),
    ("Request is in 'Disputed' state", "Cannot resolve - request is disputed"),
    ("Proposer cannot dispute their own proposal", "You cannot dispute your own proposal"),
    ("Request is not in 'Proposed' state", "Request is not in proposed state (may be already disputed or resolved)"),
    ("Dispute period has ended", "Dispute period has ended"),
    ("Dispute for this request already exists", "This request is already disputed"),
    ("Dispute is already resolved", "Dispute is already resolved"),
    ("Dispute period has not ended yet", "Dispute period has not ended yet"),
    ("Request is not resolved", "Request is not resolved yet - cannot get result"),
    // votes
    ("You already have a vote token", "You already own a vote token"),
    ("Must send exactly", "Incorrect vote token price (check with 'goo query params')"),
    ("Proposer and Disputer cannot vote in this dispute", "Proposers and disputers cannot vote on their own disputes"),
    ("Voter has already voted in this dispute", "You have already voted in this dispute"),
    ("You need at least 1 vote token to vote", "You need to buy a vote token first ('goo vote buy-token')"),
    ("Vote period has not ended yet", "Cannot reveal yet - voting period still active"),
    ("Vote period has ended", "Voting period has ended"),
    ("Reveal period has ended", "Reveal period has ended"),
    ("Voter did not participate in this dispute", "You did not vote in this dispute"),
    ("Vote already revealed", "Vote already revealed"),
    ("Dispute with this ID does not exist", "Dispute not found - invalid dispute ID"),
    ("Dispute is resolved", "Dispute is already resolved"),
    // admin
    ("Only the admin can", "Admin privileges required"),
    ("Only admin can", "Admin privileges required"),
    // general
    ("missing realm argument", "Internal error - realm context required"),
    ("failed to query", "Failed to query contract"),
    ("query failed", "Query failed"),
];

const HASH_MISMATCH: &str = "Hash does not match the revealed value and salt";

/// Map raw tool output (usually captured stderr) to a typed error.
pub fn translate(raw: &str) -> GooError {
    if raw.contains(HASH_MISMATCH) {
        return GooError::HashMismatch;
    }
    for (pattern, friendly) in ERROR_MAPPINGS {
        if raw.contains(pattern) {
            return GooError::ContractError(friendly.to_string());
        }
    }
    if raw.contains("Error =--") {
        if let Some(msg) = line_after(raw, "error:") {
            return GooError::ContractError(format!("Contract error: {}", msg));
        }
        if let Some(msg) = line_after(raw, "Data:") {
            return GooError::ContractError(msg);
        }
    }
    GooError::ExecutorError(raw.trim().to_string())
}

fn line_after(raw: &str, marker: &str) -> Option<String> {
    let start = raw.find(marker)? + marker.len();
    let rest = &raw[start..];
    let end = rest.find('\n')?;
    let msg = rest[..end].trim();
    (!msg.is_empty()).then(|| msg.to_string())
}

use chrono::{TimeZone, Utc};
use goo::core::error::GooError;
use goo::core::executor::Realm;
use goo::plugins::dispute::create_dispute;
use goo::plugins::propose::{Suggestion, propose_value, suggest_value};
use goo::plugins::query::{fetch_params, filter_by_state, list_request_ids};
use goo::plugins::request::{create_request, get_request};
use goo::plugins::research::{ResearchAnswer, ResearchOutcome, Researcher};
use goo::plugins::vote::{buy_token, commit_vote, reveal_vote};
use goo::qeval::RequestState;
use goo::vote::{VoteStore, verify};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq)]
struct Call {
    func: String,
    args: Vec<String>,
    send: Option<String>,
}

/// Realm double: canned query responses keyed by `func` or `func:arg0`,
/// and a log of every call submitted.
#[derive(Default)]
struct MockRealm {
    responses: HashMap<String, String>,
    calls: RefCell<Vec<Call>>,
    reject_calls: bool,
}

impl MockRealm {
    fn respond(mut self, key: &str, text: &str) -> Self {
        self.responses.insert(key.to_string(), text.to_string());
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl Realm for MockRealm {
    fn query(&self, func: &str, args: &[String]) -> Result<String, GooError> {
        let keyed = args.first().map(|a| format!("{}:{}", func, a));
        keyed
            .and_then(|k| self.responses.get(&k))
            .or_else(|| self.responses.get(func))
            .cloned()
            .ok_or_else(|| GooError::ContractError(format!("no response for {}", func)))
    }

    fn call(&self, func: &str, args: &[String], send: Option<&str>) -> Result<(), GooError> {
        if self.reject_calls {
            return Err(GooError::ContractError("transaction rejected".to_string()));
        }
        self.calls.borrow_mut().push(Call {
            func: func.to_string(),
            args: args.to_vec(),
            send: send.map(str::to_string),
        });
        Ok(())
    }
}

fn int_response(n: i64) -> String {
    format!("height: 0\ndata: ({} int64)\n", n)
}

fn request_response(id: &str, question: &str, yes_no: bool, state: &str) -> String {
    format!(
        "height: 0\ndata: (&(struct{{(\"{id}\" string),(\"g1jg8mtutu9khhfwc4nxmuhcpftf0pajdhfvsqf5\" std.Address),(ref(aa:1) time.Time),(\"{question}\" string),({yes_no} bool),(0 int64),(\"\" std.Address),(0 int64),(\"\" std.Address),(0 int64),(ref(aa:1) time.Time),(0 int64),(\"{state}\" string),(ref(aa:1) time.Time)}} gno.land/r/intermarch3/goo.DataRequest) *gno.land/r/intermarch3/goo.DataRequest)\n"
    )
}

struct CannedResearcher(ResearchAnswer);

impl Researcher for CannedResearcher {
    fn research(&self, _question: &str) -> Result<ResearchOutcome, GooError> {
        Ok(ResearchOutcome::from_answer(self.0.clone()))
    }
}

fn answer(value: &str) -> ResearchAnswer {
    ResearchAnswer {
        value: value.to_string(),
        sources: vec!["https://example.org/report".to_string()],
        why: "Reported by the source.".to_string(),
    }
}

#[test]
fn test_create_request_uses_default_reward() {
    let realm = MockRealm::default().respond("GetRequesterReward", &int_response(1_000_000));
    let deadline = Utc.with_ymd_and_hms(2025, 10, 28, 12, 0, 0).unwrap();

    let reward = create_request(&realm, "ETH/USD at noon?", deadline, false, None).unwrap();

    assert_eq!(reward, 1_000_000);
    assert_eq!(
        realm.calls(),
        vec![Call {
            func: "RequestData".to_string(),
            args: vec![
                "ETH/USD at noon?".to_string(),
                "false".to_string(),
                deadline.timestamp().to_string(),
            ],
            send: Some("1000000ugnot".to_string()),
        }]
    );
}

#[test]
fn test_create_request_explicit_reward_skips_query() {
    let realm = MockRealm::default();
    let deadline = Utc.with_ymd_and_hms(2025, 10, 28, 12, 0, 0).unwrap();

    let reward = create_request(&realm, "Rain in Paris?", deadline, true, Some(250)).unwrap();

    assert_eq!(reward, 250);
    assert_eq!(realm.calls()[0].send.as_deref(), Some("250ugnot"));
    assert_eq!(realm.calls()[0].args[1], "true");
    assert!(matches!(
        create_request(&realm, "x", deadline, true, Some(-5)),
        Err(GooError::ValidationError(_))
    ));
}

#[test]
fn test_propose_and_dispute_send_the_bond() {
    let realm = MockRealm::default().respond("GetBond", &int_response(2_000_000));

    assert_eq!(propose_value(&realm, "0000001", " 3500 ").unwrap(), 2_000_000);
    assert_eq!(create_dispute(&realm, "0000001").unwrap(), 2_000_000);

    let calls = realm.calls();
    assert_eq!(calls[0].func, "ProposeValue");
    assert_eq!(calls[0].args, vec!["0000001", "3500"]);
    assert_eq!(calls[0].send.as_deref(), Some("2000000ugnot"));
    assert_eq!(calls[1].func, "DisputeData");
    assert_eq!(calls[1].args, vec!["0000001"]);
}

#[test]
fn test_bond_query_failure_submits_nothing() {
    let realm = MockRealm::default();
    assert!(propose_value(&realm, "0000001", "1").is_err());
    assert!(realm.calls().is_empty());
}

#[test]
fn test_commit_then_reveal() {
    let tmp = tempdir().unwrap();
    let votes = VoteStore::new(tmp.path());
    let realm = MockRealm::default();

    let receipt = commit_vote(&realm, &votes, "0000001", "1", None).unwrap();
    assert!(receipt.saved.is_ok());
    assert!(verify(&receipt.hash, "1", &receipt.salt.value));

    let revealed = reveal_vote(&realm, &votes, "0000001").unwrap();
    assert_eq!(revealed, "1");

    let calls = realm.calls();
    assert_eq!(calls[0].func, "VoteOnDispute");
    assert_eq!(calls[0].args, vec!["0000001".to_string(), receipt.hash.clone()]);
    assert_eq!(calls[1].func, "RevealVote");
    assert_eq!(
        calls[1].args,
        vec!["0000001".to_string(), "1".to_string(), receipt.salt.value.clone()]
    );
}

#[test]
fn test_reveal_refuses_tampered_record() {
    let tmp = tempdir().unwrap();
    let votes = VoteStore::new(tmp.path());
    let realm = MockRealm::default();
    commit_vote(&realm, &votes, "0000002", "42", Some("pepper")).unwrap();

    let path = votes.path_for("0000002");
    let tampered = fs::read_to_string(&path).unwrap().replace("\"42\"", "\"43\"");
    fs::write(&path, tampered).unwrap();

    assert!(matches!(
        reveal_vote(&realm, &votes, "0000002"),
        Err(GooError::HashMismatch)
    ));
    assert_eq!(realm.calls().len(), 1);
}

#[test]
fn test_rejected_commit_stores_nothing() {
    let tmp = tempdir().unwrap();
    let votes = VoteStore::new(tmp.path());
    let realm = MockRealm {
        reject_calls: true,
        ..MockRealm::default()
    };

    assert!(commit_vote(&realm, &votes, "0000003", "1", None).is_err());
    assert!(votes.list().unwrap().is_empty());
    assert!(matches!(
        commit_vote(&realm, &votes, "../escape", "1", None),
        Err(GooError::ValidationError(_))
    ));
}

#[test]
fn test_failed_local_save_still_commits() {
    let tmp = tempdir().unwrap();
    let blocker = tmp.path().join("votes");
    fs::write(&blocker, "not a directory").unwrap();
    let votes = VoteStore::new(&blocker);
    let realm = MockRealm::default();

    let receipt = commit_vote(&realm, &votes, "0000004", "7", None).unwrap();

    assert!(receipt.saved.is_err());
    assert!(verify(&receipt.hash, "7", &receipt.salt.value));
    assert_eq!(realm.calls().len(), 1);
    assert_eq!(realm.calls()[0].func, "VoteOnDispute");
}

#[test]
fn test_empty_salt_is_replaced_and_reported() {
    let tmp = tempdir().unwrap();
    let votes = VoteStore::new(tmp.path());
    let realm = MockRealm::default();

    let receipt = commit_vote(&realm, &votes, "0000005", "1", Some("")).unwrap();
    assert!(receipt.salt_generated);
    assert_eq!(receipt.salt.value.len(), 64);

    let receipt = commit_vote(&realm, &votes, "0000006", "1", Some("pepper")).unwrap();
    assert!(!receipt.salt_generated);
    assert_eq!(receipt.salt.value, "pepper");
}

#[test]
fn test_reveal_record_without_hash() {
    let tmp = tempdir().unwrap();
    let votes = VoteStore::new(tmp.path());
    fs::write(
        votes.path_for("0000008"),
        r#"{"request_id":"0000008","value":"1","salt":"abc"}"#,
    )
    .unwrap();
    let realm = MockRealm::default();

    assert_eq!(reveal_vote(&realm, &votes, "0000008").unwrap(), "1");
    assert_eq!(realm.calls()[0].args, vec!["0000008", "1", "abc"]);
}

#[test]
fn test_buy_token_sends_price() {
    let realm = MockRealm::default().respond("GetVoteTokenPrice", &int_response(5_000_000));
    assert_eq!(buy_token(&realm).unwrap(), 5_000_000);
    assert_eq!(realm.calls()[0].func, "BuyInitialVoteToken");
    assert_eq!(realm.calls()[0].send.as_deref(), Some("5000000ugnot"));
}

#[test]
fn test_params_fetched_independently() {
    let realm = MockRealm::default()
        .respond("GetBond", &int_response(2_000_000))
        .respond("GetRevealDuration", &int_response(3600));

    let params = fetch_params(&realm);
    assert_eq!(params.len(), 6);
    assert_eq!(params[0].value.as_ref().ok(), Some(&2_000_000));
    assert!(params[1].value.is_err());
    assert_eq!(params[4].value.as_ref().ok(), Some(&3600));
}

#[test]
fn test_list_and_filter_by_state() {
    let realm = MockRealm::default()
        .respond(
            "GetRequestIds",
            "data: (slice[(\"0000001\" string),(\"0000002\" string),(\"0000003\" string)] []string)\n",
        )
        .respond("GetRequest:0000001", &request_response("0000001", "A?", true, "Proposed"))
        .respond("GetRequest:0000002", &request_response("0000002", "B?", true, "Resolved"))
        .respond("GetRequest:0000003", "data: garbage\n");

    let ids = list_request_ids(&realm).unwrap();
    assert_eq!(ids, vec!["0000001", "0000002", "0000003"]);
    assert_eq!(filter_by_state(&realm, ids, RequestState::Proposed), vec!["0000001"]);
}

#[test]
fn test_suggest_value_maps_yes_to_one() {
    let realm = MockRealm::default().respond(
        "GetRequest",
        &request_response("0000001", "Did it rain in Paris on 2025-10-20?", true, "Requested"),
    );

    let suggestion = suggest_value(&realm, &CannedResearcher(answer("Yes")), "0000001").unwrap();
    match suggestion {
        Suggestion::Value {
            question,
            is_yes_no,
            value,
            ..
        } => {
            assert_eq!(question, "Did it rain in Paris on 2025-10-20?");
            assert!(is_yes_no);
            assert_eq!(value, "1");
        }
        other => panic!("expected a value, got {:?}", other),
    }
    assert!(realm.calls().is_empty());
}

#[test]
fn test_suggest_value_sentinels() {
    let realm = MockRealm::default()
        .respond("GetRequest", &request_response("0000001", "BTC price in 2030?", false, "Requested"));

    let future = suggest_value(&realm, &CannedResearcher(answer("FUTURE_QUESTION_ERROR")), "0000001");
    assert!(matches!(future, Ok(Suggestion::FutureQuestion { .. })));

    let missing = suggest_value(&realm, &CannedResearcher(answer("INSUFFICIENT DATA")), "0000001");
    assert!(matches!(missing, Ok(Suggestion::InsufficientData { .. })));

    let not_numeric = suggest_value(&realm, &CannedResearcher(answer("about 3k")), "0000001");
    assert!(not_numeric.is_err());
}

#[test]
fn test_get_request_keeps_raw_text() {
    let raw = request_response("0000007", "Q?", false, "Disputed");
    let realm = MockRealm::default().respond("GetRequest", &raw);
    let (record, text) = get_request(&realm, "0000007").unwrap();
    assert_eq!(record.state, RequestState::Disputed);
    assert_eq!(text, raw);
}

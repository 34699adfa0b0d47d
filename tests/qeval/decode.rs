use goo::core::error::GooError;
use goo::qeval::collection::{list_count, list_items};
use goo::qeval::fields::split_fields;
use goo::qeval::records::{
    DATA_REQUEST_FIELDS, RequestState, decode_data_request, decode_dispute, decode_int64,
    decode_request_ids,
};
use proptest::prelude::*;

const CREATOR: &str = "g1jg8mtutu9khhfwc4nxmuhcpftf0pajdhfvsqf5";
const PROPOSER: &str = "g1us8428u2a5satrlxzagqqa5m6vmuze025anjlj";

/// The 14 fields of a request record, in realm order.
fn request_fields(state: &str) -> Vec<String> {
    vec![
        "(\"0000001\" string)".to_string(),
        format!("(\"{}\" std.Address)", CREATOR),
        "(struct{(0 uint64),(63897249600 int64),(nil *time.Location)} time.Time)".to_string(),
        "(\"Did BTC close above $100,000 (USD) on 2025-10-27?\" string)".to_string(),
        "(true bool)".to_string(),
        "(1 int64)".to_string(),
        format!("(\"{}\" std.Address)", PROPOSER),
        "(2000000 int64)".to_string(),
        "(\"\" std.Address)".to_string(),
        "(0 int64)".to_string(),
        "(ref(3f1c0a:12) time.Time)".to_string(),
        "(0 int64)".to_string(),
        state.to_string(),
        "(ref(3f1c0a:12) time.Time)".to_string(),
    ]
}

fn gnokey_response(fields: &[String]) -> String {
    format!(
        "height: 0\ndata: (&(struct{{{}}} gno.land/r/intermarch3/goo.DataRequest) *gno.land/r/intermarch3/goo.DataRequest)\n",
        fields.join(",")
    )
}

#[test]
fn test_request_record_decodes_every_field() {
    let text = gnokey_response(&request_fields("(\"Proposed\" string)"));
    let req = decode_data_request(&text).unwrap();

    assert_eq!(req.id.as_deref(), Some("0000001"));
    assert_eq!(req.creator.as_deref(), Some(CREATOR));
    assert_eq!(
        req.question.as_deref(),
        Some("Did BTC close above $100,000 (USD) on 2025-10-27?")
    );
    assert_eq!(req.is_yes_no, Some(true));
    assert_eq!(req.proposed_value, Some(1));
    assert_eq!(req.proposer.as_deref(), Some(PROPOSER));
    assert_eq!(req.proposer_bond, Some(2_000_000));
    assert_eq!(req.disputer.as_deref(), Some(""));
    assert_eq!(req.disputer_bond, Some(0));
    assert!(req.resolution_time.as_ref().is_some_and(|t| t.is_shared()));
    assert_eq!(req.winning_value, Some(0));
    assert_eq!(req.state, RequestState::Proposed);
    assert_eq!(req.deadline.as_ref().map(|t| t.to_string()), Some("N/A".to_string()));
}

#[test]
fn test_inline_time_is_kept_verbatim() {
    let raw = "(struct{(0 uint64),(63897249600 int64),(nil *time.Location)} time.Time)";
    let req = decode_data_request(&gnokey_response(&request_fields("(\"Requested\" string)"))).unwrap();
    let created = req.created_at.unwrap();
    assert!(!created.is_shared());
    // The wall field is 0 here; nothing may read it as a unix date.
    assert_eq!(created.to_string(), raw);
    assert!(!created.to_string().contains("1970"));
}

#[test]
fn test_every_state_name_maps() {
    for (name, state) in [
        ("Requested", RequestState::Requested),
        ("Proposed", RequestState::Proposed),
        ("Disputed", RequestState::Disputed),
        ("Resolved", RequestState::Resolved),
        ("Cancelled", RequestState::Unknown),
    ] {
        let text = gnokey_response(&request_fields(&format!("(\"{}\" string)", name)));
        assert_eq!(decode_data_request(&text).unwrap().state, state);
    }
}

#[test]
fn test_thirteen_fields_is_a_mismatch() {
    let mut fields = request_fields("(\"Requested\" string)");
    fields.pop();
    match decode_data_request(&gnokey_response(&fields)) {
        Err(GooError::FieldCountMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, DATA_REQUEST_FIELDS);
            assert_eq!(found, 13);
        }
        other => panic!("expected FieldCountMismatch, got {:?}", other),
    }
}

#[test]
fn test_unreadable_field_is_none_not_zero() {
    let mut fields = request_fields("(\"Requested\" string)");
    fields[7] = "(\"oops\" string)".to_string();
    let req = decode_data_request(&gnokey_response(&fields)).unwrap();
    assert_eq!(req.proposer_bond, None);
    assert_eq!(req.disputer_bond, Some(0));
}

#[test]
fn test_unbalanced_record_is_malformed() {
    let text = "data: (struct{(\"1\" string),(2 int64} X)";
    assert!(matches!(
        decode_data_request(text),
        Err(GooError::MalformedRecord(_))
    ));
}

#[test]
fn test_dispute_with_no_votes() {
    let text = "height: 0\ndata: (&(struct{(\"0000003\" string),(slice[] []gno.land/r/intermarch3/goo.Vote),(map{} map[std.Address]int),(0 int64),(false bool),(0 int64),(struct{(0 uint64),(63897336000 int64),(nil *time.Location)} time.Time),(ref(9e:4) time.Time)} gno.land/r/intermarch3/goo.Dispute) *gno.land/r/intermarch3/goo.Dispute)\n";
    let dispute = decode_dispute(text).unwrap();
    assert_eq!(dispute.request_id.as_deref(), Some("0000003"));
    assert_eq!(dispute.vote_count, Some(0));
    assert_eq!(dispute.resolved_vote_count, Some(0));
    assert_eq!(dispute.is_resolved, Some(false));
    assert_eq!(dispute.unrevealed(), Some(0));
    assert!(dispute.end_time.as_ref().is_some_and(|t| !t.is_shared()));
    assert!(dispute.end_reveal_time.as_ref().is_some_and(|t| t.is_shared()));
}

#[test]
fn test_empty_list_literal() {
    assert!(list_items("slice[]").unwrap().is_empty());
    assert_eq!(list_count("(slice[] []string)").unwrap(), 0);
    assert!(decode_request_ids("data: (slice[] []string)\n").unwrap().is_empty());
}

#[test]
fn test_scalar_getter() {
    assert_eq!(decode_int64("height: 0\ndata: (86400 int64)\n").unwrap(), 86_400);
}

fn field_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(|n| format!("({} int64)", n)),
        "[a-zA-Z0-9 ,(){}\\[\\]]{0,12}".prop_map(|s| format!("(\"{}\" string)", s)),
        any::<bool>().prop_map(|b| format!("({} bool)", b)),
        "[0-9a-f]{1,6}".prop_map(|h| format!("(ref({}:1) time.Time)", h)),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|items| format!("(slice[{}] []T)", items.join(","))),
            prop::collection::vec(inner, 0..4)
                .prop_map(|items| format!("(struct{{{}}} T)", items.join(","))),
        ]
    })
}

proptest! {
    #[test]
    fn prop_split_is_lossless(fields in prop::collection::vec(field_strategy(), 1..10)) {
        let body = fields.join(",");
        let split = split_fields(&body).unwrap();
        prop_assert_eq!(split.len(), fields.len());
        prop_assert_eq!(split.join(","), body);
    }
}

//! Decoder for the textual values printed by the `vm/qeval` query endpoint.
//!
//! Pure functions only: every call takes the response text and returns a
//! typed value or a `GooError`, with no state kept between calls.

pub mod collection;
pub mod extract;
pub mod fields;
pub mod grammar;
pub mod records;

pub use records::{
    DataRequestRecord, DisputeRecord, RequestState, decode_data_request, decode_dispute,
    decode_int64, decode_request_ids,
};

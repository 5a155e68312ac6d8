/// Resource client for the upstream panel API.
///
/// `transport` owns the network seam (trait + reqwest + mock); `rules` maps rule
/// operations onto it.
pub mod rules;
pub mod transport;

pub use rules::{RuleClient, RuleId};
pub use transport::{ApiRequest, HttpTransport, MockTransport, Transport, TransportState};

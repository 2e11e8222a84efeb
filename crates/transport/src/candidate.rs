//! Parsing of ICE candidate attribute text into the structured form posted to
//! the relay's signaling endpoint.

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_repr::Deserialize_repr;
use serde_repr::Serialize_repr;

use crate::error::CandidateParseError;

const CANDIDATE_PREFIX: &str = "candidate:";

/// Transport protocol of a candidate. Serializes as the integer the relay
/// expects.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CandidateProtocol {
    /// Protocol token was not recognized.
    #[default]
    Unknown = 0,
    /// UDP candidate.
    Udp = 1,
    /// TCP candidate.
    Tcp = 2,
}

impl CandidateProtocol {
    fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "udp" => Self::Udp,
            "tcp" => Self::Tcp,
            _ => Self::Unknown,
        }
    }
}

/// A locally discovered ICE candidate in the structured form the relay
/// expects in the `/candidate` signaling body.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct IceCandidate {
    /// Candidate foundation.
    pub foundation: String,
    /// Candidate priority.
    pub priority: u32,
    /// Connection address, an IP or FQDN.
    pub address: String,
    /// Transport protocol.
    pub protocol: CandidateProtocol,
    /// Connection port.
    pub port: u16,
    /// Candidate type: `host`, `srflx`, `prflx` or `relay`.
    #[serde(rename = "type")]
    pub candidate_type: String,
    /// Component id, 1 for RTP, 2 for RTCP.
    pub component: u16,
    /// Related address for reflexive and relay candidates. Empty for host
    /// candidates.
    #[serde(rename = "relatedAddress")]
    pub related_address: String,
    /// Related port for reflexive and relay candidates.
    #[serde(rename = "relatedPort")]
    pub related_port: u16,
    /// TCP candidate type: `active`, `passive` or `so`. Empty for UDP
    /// candidates.
    #[serde(rename = "tcpType")]
    pub tcp_type: String,
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, CandidateParseError> {
    value.parse().map_err(|_| CandidateParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Candidate attribute text as produced by a peer connection, e.g:
/// `candidate:1 1 udp 2113667326 192.168.1.4 54321 typ host`.
/// The mandatory fields are foundation, component, protocol, priority,
/// address, port, the literal `typ` and the candidate type; `raddr`, `rport`
/// and `tcptype` are recognized as keyword pairs in the tail.
impl FromStr for IceCandidate {
    type Err = CandidateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(stripped) = s.strip_prefix(CANDIDATE_PREFIX) else {
            return Err(CandidateParseError::MissingPrefix(s.to_string()));
        };

        let fields: Vec<&str> = stripped.split_whitespace().collect();
        if fields.len() < 8 {
            return Err(CandidateParseError::TooFewFields(fields.len()));
        }
        if fields[6] != "typ" {
            return Err(CandidateParseError::TypKeywordNotFound(
                fields[6].to_string(),
            ));
        }

        let mut candidate = Self {
            foundation: fields[0].to_string(),
            component: parse_field("component", fields[1])?,
            protocol: CandidateProtocol::from_token(fields[2]),
            priority: parse_field("priority", fields[3])?,
            address: fields[4].to_string(),
            port: parse_field("port", fields[5])?,
            candidate_type: fields[7].to_string(),
            ..Self::default()
        };

        // Keyword pairs after the candidate type. Unrecognized keywords such
        // as `generation` or `ufrag` are skipped together with their value.
        let mut rest = fields[8..].chunks_exact(2);
        for pair in rest.by_ref() {
            match pair[0] {
                "raddr" => candidate.related_address = pair[1].to_string(),
                "rport" => candidate.related_port = parse_field("rport", pair[1])?,
                "tcptype" => candidate.tcp_type = pair[1].to_string(),
                _ => {}
            }
        }

        Ok(candidate)
    }
}

#![allow(missing_docs)]

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum IceServerError {
    #[error("Url parse error")]
    UrlParse(#[from] url::ParseError),

    #[error("Ice server scheme {0} has not supported yet")]
    SchemeNotSupported(String),

    #[error("Cannot extract host from url")]
    UrlMissHost,
}

#[derive(thiserror::Error, Debug)]
pub enum CandidateParseError {
    #[error("Candidate attribute must start with \"candidate:\", got {0}")]
    MissingPrefix(String),

    #[error("Candidate attribute has {0} fields, expected at least 8")]
    TooFewFields(usize),

    #[error("Expected literal \"typ\" at field 6, got {0}")]
    TypKeywordNotFound(String),

    #[error("Invalid {field} value {value}")]
    InvalidField { field: &'static str, value: String },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IceServer error: {0}")]
    IceServer(#[from] IceServerError),

    #[error("Candidate error: {0}")]
    Candidate(#[from] CandidateParseError),

    #[error("Data channel is not open, cannot send message")]
    DataChannelNotOpen,

    #[error("Local SDP generation error: {0}")]
    LocalSdpGeneration(String),

    #[error("Remote SDP is not an answer")]
    RemoteSdpNotAnswer,

    #[error("Connection {0} already exists")]
    ConnectionAlreadyExists(String),

    #[error("Connection {0} not found, should handshake first")]
    ConnectionNotFound(String),

    #[error("Connection {0} is released")]
    ConnectionReleased(String),
}

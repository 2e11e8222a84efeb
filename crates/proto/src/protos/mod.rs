pub mod relayer;
pub mod resolver;

impl std::fmt::Display for resolver::Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = resolver::ErrorCode::try_from(self.code)
            .map(|code| code.as_str_name())
            .unwrap_or("ERR_UNKNOWN");
        write!(f, "{} ({})", self.message, code)
    }
}

impl std::fmt::Display for relayer::Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = relayer::ErrorCode::try_from(self.code)
            .map(|code| code.as_str_name())
            .unwrap_or("ERR_UNKNOWN");
        write!(f, "{} ({})", self.message, code)
    }
}

/// Classification of a failed source operation.
///
/// The aggregator uses this only for reporting: every kind is contained
/// inside the poll cycle and withholds the failing operation's fields.
///
/// # Behavior Summary
///
/// | Kind | Typical cause | Retried within the cycle? |
/// |------|---------------|---------------------------|
/// | `Transport` | connection refused, DNS, timeout | No |
/// | `Protocol` | non-2xx status, malformed JSON | No |
/// | `Logical` | envelope `flag=false`, missing payload | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request never produced a response (connection error or timeout).
    Transport,

    /// A response arrived but could not be interpreted as an envelope.
    Protocol,

    /// The envelope was well formed but reported failure or carried no data.
    Logical,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Protocol => "protocol",
            FailureKind::Logical => "logical",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

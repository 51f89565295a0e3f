use std::time::Duration;

/// Classification of a single domain check. Error kinds carry the stable
/// code written into the error log, so grepping old logs keeps working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Ok,
    DnsError,
    MultipleAddresses,
    WrongAddress,
    Uri1Failure,
    Uri2Failure,
}

impl CheckOutcome {
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CheckOutcome::Ok => None,
            CheckOutcome::DnsError => Some("e01"),
            CheckOutcome::MultipleAddresses => Some("e02"),
            CheckOutcome::WrongAddress => Some("e03"),
            CheckOutcome::Uri1Failure => Some("e04"),
            CheckOutcome::Uri2Failure => Some("e05"),
        }
    }

    /// Formats the timestamp-prefixed log line for this outcome.
    pub fn log_line(&self, time_format: &str, domain: &str, detail: &str) -> String {
        let ts = chrono::Local::now().format(time_format);
        match self.code() {
            Some(code) => format!("{} '{}': ({}) {}", ts, domain, code, detail),
            None => format!("{} '{}': {}", ts, domain, detail),
        }
    }
}

/// One message for the normal sink. Ownership moves from the producing
/// worker to the sink; nothing is shared after the send.
#[derive(Debug)]
pub enum LogLine {
    /// Run status lines (Starting, Finished, summary block).
    Status(String),
    /// Exactly one per domain that passed every check.
    DomainOk(String),
}

impl LogLine {
    pub fn text(&self) -> &str {
        match self {
            LogLine::Status(line) | LogLine::DomainOk(line) => line,
        }
    }
}

/// Final numbers for one run, complete only after both sinks have drained.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub domains: usize,
    pub ok: u64,
    pub errors: u64,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

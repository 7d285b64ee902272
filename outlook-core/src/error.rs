use thiserror::Error;

/// Failures raised by the aggregation engine and the sample model.
///
/// Transport and configuration problems are reported through `anyhow`
/// with context; this type is reserved for conditions the caller may want
/// to match on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OutlookError {
    #[error("incomplete data: required field `{field}` is missing")]
    IncompleteData { field: &'static str },

    #[error("malformed sample at {timestamp}: {reason}")]
    MalformedSample { timestamp: i64, reason: String },

    #[error("cannot summarize an empty bucket")]
    EmptyBucket,

    #[error("timestamp {0} is outside the representable date range")]
    InvalidTimestamp(i64),

    #[error("unknown time zone '{0}'. Use an IANA name such as 'Europe/Berlin', or 'local'.")]
    UnknownTimeZone(String),
}

pub type Result<T, E = OutlookError> = std::result::Result<T, E>;

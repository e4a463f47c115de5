// Selection tool boundary: artifact files, process invocation, and
// reconciliation of the tool's results with the caller's lines.

pub mod artifacts;
pub mod invoke;
pub mod jaded;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a bank from loading or a lookup from succeeding.
///
/// Problems inside individual entries are never reported here: those are
/// logged and defaulted while the entry is decoded.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Root of the {bank} document is {found}, expected an object")]
    NotAnObject {
        bank: &'static str,
        found: &'static str,
    },
    #[error("The {bank} bank has no entry named \"{name}\"")]
    NotFound { bank: &'static str, name: String },
    #[error("Country turn order IDs are duplicated or use the reserved NO_ARMY value")]
    InvalidTurnOrders,
}

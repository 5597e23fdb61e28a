use thiserror::Error;

/// Errors that abort conversion of a single recipe file. The driver logs
/// them and moves on to the next input.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The bytes do not parse as a property list at all.
    #[error("unreadable property list: {0}")]
    Plist(#[from] plist::Error),

    /// The property list parses but is not shaped like a keyed archive.
    #[error("unexpected archive shape: {0}")]
    Decode(&'static str),

    /// A required structural list is missing, or one of its entries lacks
    /// its ordering/text field.
    #[error("malformed archive: {0}")]
    Malformed(String),
}

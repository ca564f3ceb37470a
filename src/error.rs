// Crate-wide error type, unifying the four failure kinds of the design:
// config, I/O, wire-protocol, and hash-function errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeltaError {
    /// Bad configuration: unknown hasher name, zero block size, negative
    /// base size, and similar caller mistakes.
    #[error("config error: {0}")]
    Config(String),

    /// Underlying read/write failure, including short reads/writes on a
    /// field that was required to be read/written in full.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed wire data: unknown opcode, truncated record, hash-size
    /// mismatch between a signature and the algorithm decoding it.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Failure surfaced from a hash implementation.
    #[error("hash error: {0}")]
    Hash(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: DeltaError = io_err.into();
        assert!(matches!(err, DeltaError::Io(_)));
    }

    #[test]
    fn display_messages_are_informative() {
        let err = DeltaError::Protocol("unknown opcode 7".to_string());
        assert_eq!(err.to_string(), "protocol error: unknown opcode 7");
    }
}

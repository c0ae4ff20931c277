/// Board-geometry failures. Either one ends the run: no partial board is
/// produced once the outline or its normalization is unusable.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("chessboard not detected: {reason}")]
    BoardNotDetected { reason: String },
    #[error("degenerate board outline: {reason}")]
    DegenerateBoard { reason: String },
}

impl GeometryError {
    pub(crate) fn not_detected(reason: impl Into<String>) -> Self {
        Self::BoardNotDetected {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateBoard {
            reason: reason.into(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Where the 8x8 grid sits inside the canonical square image.
///
/// One value of this type is shared by everything that maps pixels to
/// squares; there are no other copies of these numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeometry {
    /// Offset of the playable area from the image's top-left corner, px.
    pub border: i32,
    /// Side of the playable area, px.
    pub grid_extent: i32,
    /// File letter of each column, left to right.
    pub file_labels: [char; 8],
    /// Rank lookup per row, top to bottom. The mapped rank is
    /// `8 - rank_labels[row] + 1`.
    pub rank_labels: [u8; 8],
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            border: 10,
            grid_extent: 204,
            file_labels: ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'],
            rank_labels: [8, 7, 6, 5, 4, 3, 2, 1],
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridConfigError {
    #[error("border must be >= 0 (got {0})")]
    NegativeBorder(i32),
    #[error("grid extent must be at least 8 px (got {0})")]
    GridTooSmall(i32),
    #[error("file labels must be a permutation of a..h (got {0:?})")]
    InvalidFileLabels([char; 8]),
    #[error("rank labels must be a permutation of 1..8 (got {0:?})")]
    InvalidRankLabels([u8; 8]),
    #[error("piece letter {letter:?} for class {label:?} is not a FEN piece")]
    InvalidPieceLetter { label: String, letter: char },
}

impl GridGeometry {
    /// Side of one square, truncated: the last row/column may be a few
    /// pixels short of `grid_extent`.
    pub fn block_size(&self) -> i32 {
        self.grid_extent / 8
    }

    pub fn validate(&self) -> Result<(), GridConfigError> {
        if self.border < 0 {
            return Err(GridConfigError::NegativeBorder(self.border));
        }
        if self.grid_extent < 8 {
            return Err(GridConfigError::GridTooSmall(self.grid_extent));
        }
        let mut files = self.file_labels;
        files.sort_unstable();
        if files != ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'] {
            return Err(GridConfigError::InvalidFileLabels(self.file_labels));
        }
        let mut ranks = self.rank_labels;
        ranks.sort_unstable();
        if ranks != [1, 2, 3, 4, 5, 6, 7, 8] {
            return Err(GridConfigError::InvalidRankLabels(self.rank_labels));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_is_truncated_to_25() {
        let g = GridGeometry::default();
        assert_eq!(g.block_size(), 25);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn validation_catches_bad_tables() {
        let mut g = GridGeometry::default();
        g.rank_labels = [8, 8, 6, 5, 4, 3, 2, 1];
        assert!(matches!(
            g.validate(),
            Err(GridConfigError::InvalidRankLabels(_))
        ));

        let mut g = GridGeometry::default();
        g.file_labels[0] = 'z';
        assert!(matches!(
            g.validate(),
            Err(GridConfigError::InvalidFileLabels(_))
        ));

        let g = GridGeometry {
            grid_extent: 7,
            ..GridGeometry::default()
        };
        assert_eq!(g.validate(), Err(GridConfigError::GridTooSmall(7)));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let g: GridGeometry = serde_json::from_str(r#"{"border": 12}"#).expect("json");
        assert_eq!(g.border, 12);
        assert_eq!(g.grid_extent, 204);
    }
}

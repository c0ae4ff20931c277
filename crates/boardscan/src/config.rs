//! Whole-pipeline configuration.

use std::fs;
use std::path::{Path, PathBuf};

use boardscan_core::{BoxRounding, ContourParams, NormalizeParams};
use boardscan_grid::{
    AnchorPolicy, BoardEncoder, GridConfigError, GridGeometry, GridMapper, PieceTable, Side,
};
use serde::{Deserialize, Serialize};

use crate::ScanIoError;

/// Every tunable of a scan, in one value.
///
/// Missing JSON fields fall back to their defaults, so a config file only
/// needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    /// Square resolution the photograph, mask and boxes are brought to
    /// before anything else. `None` keeps the input resolution.
    pub working_size: Option<u32>,
    pub contour: ContourParams,
    pub normalize: NormalizeParams,
    pub grid: GridGeometry,
    pub pieces: PieceTable,
    pub anchor: AnchorPolicy,
    /// Whole-pixel or sub-pixel boxes through the transform and the encoder.
    pub box_rounding: BoxRounding,
    /// Appended as ` <side> - - 0 0` when set; otherwise only the
    /// placement field is produced.
    pub side_to_move: Option<Side>,
    /// Where to write the warped board with its boxes drawn in. Nothing
    /// is written unless a path is set.
    pub debug_image: Option<PathBuf>,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            working_size: Some(256),
            contour: ContourParams::default(),
            normalize: NormalizeParams::default(),
            grid: GridGeometry::default(),
            pieces: PieceTable::default(),
            anchor: AnchorPolicy::default(),
            box_rounding: BoxRounding::default(),
            side_to_move: None,
            debug_image: None,
        }
    }
}

impl ScanParams {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScanIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ScanIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn build_mapper(&self) -> Result<GridMapper, GridConfigError> {
        GridMapper::new(self.grid.clone())
    }

    /// Validated encoder over this config's grid, piece table, anchor and
    /// box rounding.
    pub fn build_encoder(&self) -> Result<BoardEncoder, GridConfigError> {
        self.pieces.validate()?;
        Ok(BoardEncoder::new(
            self.build_mapper()?,
            self.pieces.clone(),
            self.anchor,
        )
        .with_rounding(self.box_rounding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_canonical_layout() {
        let p = ScanParams::default();
        assert_eq!(p.working_size, Some(256));
        assert_eq!(p.normalize.output_size, 256);
        assert_eq!(p.normalize.margin_px, 10.0);
        assert_eq!(p.grid.border, 10);
        assert_eq!(p.grid.grid_extent, 204);
        assert_eq!(p.anchor, AnchorPolicy::BottomCenter);
        assert_eq!(p.box_rounding, BoxRounding::Truncate);
        assert_eq!(p.debug_image, None);
        assert!(p.build_encoder().is_ok());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let p: ScanParams = serde_json::from_str(
            r#"{"side_to_move": "b", "grid": {"border": 4}, "working_size": null}"#,
        )
        .expect("json");
        assert_eq!(p.side_to_move, Some(Side::Black));
        assert_eq!(p.grid.border, 4);
        assert_eq!(p.grid.grid_extent, 204);
        assert_eq!(p.working_size, None);
        assert_eq!(p.pieces, PieceTable::default());
        assert_eq!(p.box_rounding, BoxRounding::Truncate);

        let exact: ScanParams =
            serde_json::from_str(r#"{"box_rounding": "exact"}"#).expect("json");
        assert_eq!(exact.box_rounding, BoxRounding::Exact);
        assert_eq!(
            exact.build_encoder().expect("encoder").rounding(),
            BoxRounding::Exact
        );
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan.json");
        let mut p = ScanParams::default();
        p.side_to_move = Some(Side::White);
        p.debug_image = Some(dir.path().join("warped.png"));
        p.write_json(&path).expect("write");
        assert_eq!(ScanParams::load_json(&path).expect("load"), p);
    }

    #[test]
    fn invalid_grid_fails_encoder_construction() {
        let mut p = ScanParams::default();
        p.grid.grid_extent = 3;
        assert_eq!(
            p.build_encoder().unwrap_err(),
            GridConfigError::GridTooSmall(3)
        );
    }
}

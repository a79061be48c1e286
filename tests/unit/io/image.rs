//! Validates PNG layer export and GIF visualization output

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use voxelwave::catalog::builder::ModuleCatalog;
    use voxelwave::catalog::presets::preset;
    use voxelwave::io::image::export_layers_png;
    use voxelwave::io::visualization::CollapseCapture;
    use voxelwave::solver::executor::{Solver, SolverConfig};
    use voxelwave::spatial::grid::GridVolume;

    fn solve_columns(volume: GridVolume) -> (voxelwave::solver::executor::SolvedGrid, Vec<[u8; 4]>) {
        let preset_data = preset("columns").unwrap();
        let catalog = Arc::new(ModuleCatalog::build(&preset_data.prototypes).unwrap());
        let config = SolverConfig {
            seed: Some(17),
            ..SolverConfig::default()
        };
        let mut solver = Solver::new(catalog, volume, config).unwrap();
        (solver.solve().unwrap(), preset_data.colors)
    }

    // One map per vertical layer, tiled horizontally with a gap column
    #[test]
    fn test_png_export_dimensions() {
        let volume = GridVolume::new(4, 3, 5);
        let (solved, colors) = solve_columns(volume);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layers.png");
        export_layers_png(&solved, &colors, path.to_str().unwrap()).unwrap();

        let img = image::open(&path).unwrap();
        // 3 layers of width 4 plus 2 one-pixel gaps
        assert_eq!(img.width(), 4 * 3 + 2);
        assert_eq!(img.height(), 5);
    }

    #[test]
    fn test_png_export_creates_parent_directories() {
        let volume = GridVolume::new(2, 1, 2);
        let (solved, colors) = solve_columns(volume);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/out.png");
        export_layers_png(&solved, &colors, path.to_str().unwrap()).unwrap();
        assert!(path.exists());
    }

    // A missing color entry is an error, not a silent fallback
    #[test]
    fn test_png_export_rejects_missing_colors() {
        let volume = GridVolume::new(3, 2, 3);
        let (solved, _) = solve_columns(volume);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        // Air alone cannot color the solved structure
        let too_few = vec![[0u8, 0, 0, 0]];
        let has_structure = solved.placements().next().is_some();
        let result = export_layers_png(&solved, &too_few, path.to_str().unwrap());
        if has_structure {
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_gif_export_writes_frames() {
        let volume = GridVolume::new(2, 1, 2);
        let mut capture = CollapseCapture::new(
            volume,
            vec![[0, 0, 0, 0], [200, 40, 40, 255]],
        );
        capture.record_placement([0, 0, 0], 1, 1);
        capture.record_placement([1, 0, 1], 1, 2);
        capture.record_retraction([1, 0, 1], 3);
        capture.record_reset(4);
        capture.record_placement([1, 0, 0], 1, 5);
        assert_eq!(capture.event_count(), 5);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collapse.gif");
        capture.export_gif(path.to_str().unwrap(), 50).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    // An empty capture refuses to export
    #[test]
    fn test_gif_export_requires_events() {
        let capture = CollapseCapture::new(GridVolume::new(2, 1, 2), vec![[10, 10, 10, 255]]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.gif");
        assert!(capture.export_gif(path.to_str().unwrap(), 50).is_err());
    }
}

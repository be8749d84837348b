mod tests {
    use goal_light_composer::geometry::{
        MatrixGeometry, RunDirection, SerpentineAxis, StartCorner,
    };

    const CORNERS: [StartCorner; 4] = [
        StartCorner::TopLeft,
        StartCorner::TopRight,
        StartCorner::BottomLeft,
        StartCorner::BottomRight,
    ];

    fn assert_bijection(geometry: &MatrixGeometry) {
        let count = geometry.pixel_count();
        let mut seen = vec![false; count];
        for y in 0..geometry.height {
            for x in 0..geometry.width {
                let index = geometry.index(x, y);
                assert!(index < count, "{geometry:?}: ({x},{y}) -> {index}");
                assert!(!seen[index], "{geometry:?}: index {index} hit twice");
                seen[index] = true;
            }
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn every_wiring_is_a_bijection() {
        for (width, height) in [(14, 12), (3, 4), (1, 5), (5, 1)] {
            for corner in CORNERS {
                for axis in [SerpentineAxis::Rows, SerpentineAxis::Columns] {
                    for first_run in [RunDirection::Forward, RunDirection::Reverse] {
                        let geometry = MatrixGeometry::serpentine_rows(width, height)
                            .with_start_corner(corner)
                            .with_axis(axis)
                            .with_first_run(first_run);
                        assert_bijection(&geometry);
                        assert_bijection(&geometry.progressive());
                    }
                }
            }
        }
    }

    #[test]
    fn start_corner_holds_index_zero() {
        let base = MatrixGeometry::serpentine_rows(5, 4);
        assert_eq!(base.with_start_corner(StartCorner::TopLeft).index(0, 0), 0);
        assert_eq!(base.with_start_corner(StartCorner::TopRight).index(4, 0), 0);
        assert_eq!(base.with_start_corner(StartCorner::BottomLeft).index(0, 3), 0);
        assert_eq!(base.with_start_corner(StartCorner::BottomRight).index(4, 3), 0);
    }

    #[test]
    fn reverse_first_run_starts_at_far_end() {
        let geometry = MatrixGeometry::serpentine_rows(4, 2).with_first_run(RunDirection::Reverse);
        assert_eq!(geometry.index(3, 0), 0);
        assert_eq!(geometry.index(0, 0), 3);
        assert_eq!(geometry.index(0, 1), 4);
    }

    #[test]
    fn contains_rejects_outside_cells() {
        let geometry = MatrixGeometry::serpentine_rows(14, 12);
        assert!(geometry.contains(0, 0));
        assert!(geometry.contains(13, 11));
        assert!(!geometry.contains(-1, 0));
        assert!(!geometry.contains(14, 0));
        assert!(!geometry.contains(0, 12));
    }
}

//! Logical (x, y) to physical strip index mapping
//!
//! A matrix is a single strip folded across a grid. Physical index 0 sits in
//! one of the four corners, and the strip runs either along rows or along
//! columns, optionally turning back on every run (serpentine wiring).

/// Corner that holds physical pixel 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Axis the strip runs along before folding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerpentineAxis {
    Rows,
    Columns,
}

/// Direction of the first run, seen from the start corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDirection {
    /// Away from the start corner
    Forward,
    /// The first run already runs back towards the start corner's edge
    Reverse,
}

/// Wiring description of a LED matrix
///
/// Immutable after construction; `width * height` must match the pixel count
/// of the sink it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixGeometry {
    pub width: usize,
    pub height: usize,
    pub start_corner: StartCorner,
    pub axis: SerpentineAxis,
    pub serpentine: bool,
    pub first_run: RunDirection,
}

impl MatrixGeometry {
    /// Serpentine rows starting at the top-left corner
    pub const fn serpentine_rows(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            start_corner: StartCorner::TopLeft,
            axis: SerpentineAxis::Rows,
            serpentine: true,
            first_run: RunDirection::Forward,
        }
    }

    /// Copy of this geometry with another start corner
    #[must_use]
    pub const fn with_start_corner(mut self, corner: StartCorner) -> Self {
        self.start_corner = corner;
        self
    }

    /// Copy of this geometry with another serpentine axis
    #[must_use]
    pub const fn with_axis(mut self, axis: SerpentineAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Copy of this geometry with another first run direction
    #[must_use]
    pub const fn with_first_run(mut self, direction: RunDirection) -> Self {
        self.first_run = direction;
        self
    }

    /// Copy of this geometry with plain (non-folded) row-major wiring
    #[must_use]
    pub const fn progressive(mut self) -> Self {
        self.serpentine = false;
        self
    }

    /// Number of pixels covered by the grid
    pub const fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns if (x, y) lies on the grid
    #[allow(clippy::cast_sign_loss)]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Physical strip index of the logical cell (x, y)
    ///
    /// Callers must keep `x < width` and `y < height`.
    pub const fn index(&self, x: usize, y: usize) -> usize {
        let w = self.width;
        let h = self.height;

        // Reflect into the space where index 0 is the top-left cell
        let ox = match self.start_corner {
            StartCorner::TopRight | StartCorner::BottomRight => w - 1 - x,
            StartCorner::TopLeft | StartCorner::BottomLeft => x,
        };
        let oy = match self.start_corner {
            StartCorner::BottomLeft | StartCorner::BottomRight => h - 1 - y,
            StartCorner::TopLeft | StartCorner::TopRight => y,
        };

        if !self.serpentine {
            return oy * w + ox;
        }

        match self.axis {
            SerpentineAxis::Rows => {
                let column = if self.is_reversed_run(oy) { w - 1 - ox } else { ox };
                oy * w + column
            }
            SerpentineAxis::Columns => {
                let row = if self.is_reversed_run(ox) { h - 1 - oy } else { oy };
                ox * h + row
            }
        }
    }

    const fn is_reversed_run(&self, run: usize) -> bool {
        let odd = run % 2 == 1;
        match self.first_run {
            RunDirection::Forward => odd,
            RunDirection::Reverse => !odd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_rows_fold_on_odd_rows() {
        let geometry = MatrixGeometry::serpentine_rows(4, 3);
        assert_eq!(geometry.index(0, 0), 0);
        assert_eq!(geometry.index(3, 0), 3);
        assert_eq!(geometry.index(3, 1), 4);
        assert_eq!(geometry.index(0, 1), 7);
        assert_eq!(geometry.index(0, 2), 8);
    }

    #[test]
    fn bottom_right_matches_rotated_panel() {
        // Panel mounted upside down: strip starts bottom-right
        let geometry = MatrixGeometry::serpentine_rows(14, 12)
            .with_start_corner(StartCorner::BottomRight);
        assert_eq!(geometry.index(13, 11), 0);
        assert_eq!(geometry.index(0, 11), 13);
        assert_eq!(geometry.index(0, 10), 14);
        assert_eq!(geometry.index(13, 10), 27);
    }

    #[test]
    fn columns_axis_runs_down_then_up() {
        let geometry = MatrixGeometry::serpentine_rows(3, 4).with_axis(SerpentineAxis::Columns);
        assert_eq!(geometry.index(0, 0), 0);
        assert_eq!(geometry.index(0, 3), 3);
        assert_eq!(geometry.index(1, 3), 4);
        assert_eq!(geometry.index(1, 0), 7);
    }

    #[test]
    fn progressive_ignores_axis() {
        let geometry = MatrixGeometry::serpentine_rows(4, 2)
            .with_axis(SerpentineAxis::Columns)
            .progressive();
        assert_eq!(geometry.index(1, 1), 5);
    }
}

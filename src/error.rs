//! Crate-wide error type

/// Errors raised by the rendering engine and the rig loop
///
/// Everything here is recoverable: the rig catches errors at the poll-cycle
/// boundary, shows a short indicator and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The score feed could not be reached or returned something unusable
    #[error("score feed unavailable")]
    FeedUnavailable,
    /// Only 0..=99 can be drawn with the digit font
    #[error("number {0} outside 0..=99")]
    InvalidNumber(i32),
    /// The rendered number does not fit the matrix with the requested gap
    #[error("number layout {width}x{height} exceeds matrix {matrix_width}x{matrix_height}")]
    LayoutOverflow {
        width: usize,
        height: usize,
        matrix_width: usize,
        matrix_height: usize,
    },
    /// A glyph is bigger than the matrix, so no placement could show it
    #[error("glyph {width}x{height} larger than matrix {matrix_width}x{matrix_height}")]
    GlyphTooLarge {
        width: usize,
        height: usize,
        matrix_width: usize,
        matrix_height: usize,
    },
    /// Glyph name not present in the built-in tables
    #[error("unknown glyph")]
    UnknownGlyph,
    /// Ragged rows, empty bitmap or a cell other than '0'/'1'
    #[error("malformed glyph at row {row}")]
    MalformedGlyph { row: usize },
    /// Matrix geometry does not cover the pixel sink exactly
    #[error("geometry covers {expected} pixels but sink has {actual}")]
    GeometryMismatch { expected: usize, actual: usize },
    /// Compositor frame buffer cannot hold the configured geometry
    #[error("frame buffer holds {capacity} pixels, geometry needs {needed}")]
    BufferTooSmall { capacity: usize, needed: usize },
}

pub type Result<T> = core::result::Result<T, Error>;

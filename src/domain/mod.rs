// ============================================================================
// Domain Models Module
// Configuration, sampled points and the immutable table representations
// ============================================================================

pub mod config;
pub mod dense_table;
pub mod piece;
pub mod point;
pub mod sparse_table;

pub use config::{QuadratureConfig, SamplingConfig};
pub use dense_table::DenseTable;
pub use piece::Piece;
pub use point::{midpoints, validate_abscissas, MagnitudeSeries, SampledPoint};
pub use sparse_table::SparseTable;

//! # rf-slot-grid: Grid topology for slot rule engines
//!
//! Immutable geometric model of a reel/row grid. Grids may be rectangular or
//! masked (each reel has its own number of visible rows, e.g. a `2-3-4-4-3-2`
//! hexagonal layout).
//!
//! ## Features
//!
//! - **Adjacency**: per-tile neighbor lists with direction codes
//! - **Masked layouts**: direction table driven by the row-count difference
//!   between adjacent reels
//! - **Edge metric**: ring distance from the grid boundary for every tile
//! - **Stepping**: prime-stride traversal that visits every valid tile once
//! - **Shapes**: reel/row templates placed around a center tile
//!
//! ## Architecture
//!
//! ```text
//! GridTopology (built once, shared via Arc)
//!     │
//!     ├── neighbors[tile]          → [(offset, Direction)]
//!     ├── neighbors_without_self   → random walks, jumps
//!     ├── steps_to_edge[tile]      → edge placement
//!     └── stepping_prime           → next_offset() full coverage
//!           │
//!           v
//!     Shape::place(center) → tile offsets
//! ```

pub mod direction;
pub mod error;
pub mod shape;
pub mod topology;

pub use direction::*;
pub use error::*;
pub use shape::*;
pub use topology::*;

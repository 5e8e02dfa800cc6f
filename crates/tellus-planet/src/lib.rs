//! Planet composition root: six per-face quadtrees sharing one chunk
//! forge.

mod planet;

pub use planet::Planet;

//! 파이프라인 전반에서 사용되는 공통 타입.

mod index;
mod number;
mod record;
mod variant;

pub use index::*;
pub use number::*;
pub use record::*;
pub use variant::*;

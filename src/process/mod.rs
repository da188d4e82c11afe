//! Check pipeline.
//!
//! - [`Checker`] - runs entry files through expansion, the engine and
//!   diagnostic post-processing
//! - [`CheckSession`] - temporary files of a single run
//! - [`touch_stamp`] - success marker update

mod check;
mod session;
mod stamp;
#[cfg(feature = "batch")]
mod batch;

pub use check::{is_externs_file, CheckInput, CheckOutcome, Checker, EXTERNS_SUFFIX};
pub use session::CheckSession;
pub use stamp::touch_stamp;

//! Appender implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "file")]
pub mod rotating_file;

#[cfg(feature = "console")]
pub use console::ConsoleAppender;
#[cfg(feature = "file")]
pub use file::FileAppender;
#[cfg(feature = "file")]
pub use rotating_file::{parse_size, RotationPolicy, RotationStrategy};

pub use crate::core::Appender;

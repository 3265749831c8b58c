#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::return_self_not_must_use
)]
//! Byte fonts: bitmap fonts stored as column packed bytes in a line based text
//! file (`.bff`).
//!
//! ```no_run
//! # fn main() -> bytefont::Result<()> {
//! let font = bytefont::ByteFont::load("arial_p_10.bff")?;
//! let a = font.get_bytes('A');
//! println!("{} is {} pixels high, 'A' is {} columns wide", font.name(), font.height(), a.width());
//! # Ok(())
//! # }
//! ```

mod error;
pub use error::*;

mod glyph;
pub use glyph::*;

mod packer;
pub use packer::*;

mod metadata;
pub use metadata::*;

mod font;
pub use font::*;

mod writer;
pub use writer::*;

mod reader;
pub use reader::*;

mod generator;
pub use generator::*;

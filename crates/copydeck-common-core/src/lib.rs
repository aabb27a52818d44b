//! Copydeck common core types.
//!
//! The wide-form [`ContentRow`], the parsed Word and Excel shapes, and the
//! [`ProjectData`] variant that records which of the two a project came from.
//! [`Block`] and [`Workbook`] are the decoded forms that document and
//! spreadsheet readers and writers exchange.

pub mod blocks;
pub mod content;
pub mod document;
pub mod project;
pub mod template;
pub mod workbook;

pub use blocks::*;
pub use content::*;
pub use document::*;
pub use project::*;
pub use template::*;
pub use workbook::*;

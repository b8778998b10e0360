// Parser module: turns saved article pages into plain text.

pub mod article;

pub use article::extract_text;

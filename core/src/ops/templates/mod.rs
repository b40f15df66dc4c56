//! Linking hosts and templates to templates

pub mod link;
pub mod unlink;

pub use link::{LinkTemplatesAction, LinkTemplatesInput, LinkTemplatesOutput};
pub use unlink::{UnlinkTemplatesAction, UnlinkTemplatesInput, UnlinkTemplatesOutput};

//! Infrastructure layer - storage collaborators, action dispatch and logging

pub mod action;
pub mod logging;
pub mod store;

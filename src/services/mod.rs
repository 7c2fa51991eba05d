//! Interactive surfaces. Each surface owns its own transient state and
//! enforces at most one outstanding upstream call.

pub mod chat;
pub mod dialogue;
pub mod workshop;

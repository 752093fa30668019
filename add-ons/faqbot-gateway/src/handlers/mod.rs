//! HTTP handlers. Every turn goes through [`ask::run_turn`].

pub(crate) mod ask;
pub(crate) mod grades;

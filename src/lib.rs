// src/lib.rs — Library root for pension-chat

pub mod cli;
pub mod client;
pub mod infra;
pub mod util;

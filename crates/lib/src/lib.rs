//! Leadgate core library — lead intake, validation, spam filtering, and
//! concurrent multi-channel delivery, used by the `leadgate` CLI.

pub mod channels;
pub mod config;
pub mod dispatch;
pub mod format;
pub mod init;
pub mod intake;
pub mod lead;
pub mod server;
pub mod spam;
pub mod validate;

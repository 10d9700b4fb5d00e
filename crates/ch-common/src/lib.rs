//! ChannelHub Common
//!
//! Runtime support shared by every ChannelHub binary.

pub mod logging;

pub use logging::{init_logging, LogFormat};

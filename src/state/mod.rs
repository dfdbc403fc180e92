/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The session state machine driving both screens (session.rs)
/// - Scrub preview bookkeeping (preview.rs)

pub mod data;
pub mod preview;
pub mod session;

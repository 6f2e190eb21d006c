pub mod categories;
pub mod clock;
pub mod daily_logs;
pub mod drag;
pub mod rollover;
pub mod tasks;

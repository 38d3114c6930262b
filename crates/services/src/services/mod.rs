pub mod claude_api;
pub mod daily_qt;
pub mod notifier;
pub mod reading_plan;

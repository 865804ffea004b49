pub mod chart;
pub mod chat;
pub mod mood;
pub mod mood_style;
pub mod trend;

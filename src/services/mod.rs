pub mod charts;
pub mod chat;
pub mod llm;
pub mod trends;
pub mod window;

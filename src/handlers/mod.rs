pub mod chat;
pub mod health;
pub mod moods;
pub mod trends;
pub mod ws;

pub mod transcript;
pub mod user;
pub mod voice_note;

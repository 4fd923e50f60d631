pub mod companies;
pub mod cover_letter;
pub mod profile;
pub mod render;

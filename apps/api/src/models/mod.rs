pub mod career;
pub mod profile;
pub mod question;

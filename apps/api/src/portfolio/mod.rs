// Portfolio content: projects and skills, plus the profile data resumes are built from.

pub mod handlers;
pub mod models;
pub mod profile;
pub mod store;

pub mod catalog;
pub mod health;
pub mod home;
pub mod library;
pub mod movies;
pub mod people;
pub mod session;

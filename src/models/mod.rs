pub mod application;
pub mod audit;
pub mod badge;

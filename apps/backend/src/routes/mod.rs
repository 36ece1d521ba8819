pub mod auth;
pub mod flashcards;
pub mod learner;
pub mod review;

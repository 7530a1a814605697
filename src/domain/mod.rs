pub mod message;
pub mod outcome;

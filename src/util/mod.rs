pub mod protein;

//! Phoneme inventory, pronunciation features, and phonetic distance.

pub mod distance;
pub mod inventory;
pub mod pronunciation;

pub use distance::{distance, distance_with, similarity, ClassWeightedCosts, EditCosts, UnitCosts};
pub use inventory::{PhonemeClass, UnknownPhonemeError};
pub use pronunciation::Pronunciation;

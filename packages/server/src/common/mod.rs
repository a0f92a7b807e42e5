pub mod phone;

pub use phone::{InvalidPhoneNumber, PhoneNormalizer};

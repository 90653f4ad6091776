pub mod sha512;

pub use sha512::PasswordDigest;
pub use sha512::PasswordHasher;

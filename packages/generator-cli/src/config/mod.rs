pub mod apigen;

pub use self::apigen::ApigenConfig;

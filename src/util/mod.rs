pub mod unicode;

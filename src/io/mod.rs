pub mod attempt_io;
pub mod classification_io;
pub mod config_io;
pub mod recovery;
pub mod table_store;

pub use table_store::StoreError;

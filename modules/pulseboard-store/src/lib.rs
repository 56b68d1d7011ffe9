pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod records;

pub use error::{Result, StoreError};
pub use fs::{FsKeyPhraseStore, FsObjectStore, FsPostStore};
pub use memory::{MemoryKeyPhraseStore, MemoryObjectStore, MemoryPostStore};
pub use object::{ObjectMeta, ObjectStore};
pub use records::{KeyPhraseStore, PostStore};

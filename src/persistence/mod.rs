pub mod files;
pub mod settings;
pub mod storage;

pub use files::{
    atomic_write, ensure_data_dir, init_local_data_dir, read_file, resolve_data_dir,
    settings_file, storage_file,
};
pub use settings::{load_settings, save_settings, AppSettings};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

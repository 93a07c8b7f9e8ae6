pub mod data;
pub mod event;
pub mod settings;
pub mod task;
pub mod watch;

use scheduler_core::{RecordStore, SqliteMedium};

/// Store type every command runs against.
pub type Store<'conn> = RecordStore<SqliteMedium<'conn>>;

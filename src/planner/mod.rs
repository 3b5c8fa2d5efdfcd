//! Decision logic: what to do with each entry

pub mod copy;
pub mod naming;
pub mod sync;

pub use copy::{backup_path_for, plan_copy, plan_copy_between};
pub use naming::{backup_file_name, split_base};
pub use sync::{plan_sync, SyncPlan};

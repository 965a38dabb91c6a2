mod loop_worker;
mod record;
mod resume;
mod usage;

pub use loop_worker::Tracker;
pub use record::ShutdownEvent;

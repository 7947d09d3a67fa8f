mod loader;

pub use loader::{ScheduleLoader, ScheduleLoaderError, ScheduleRecord};

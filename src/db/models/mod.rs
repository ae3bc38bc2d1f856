pub mod invoice;
pub mod project;
pub mod staff;
pub mod task;
pub mod time_log;

pub use invoice::{Invoice, InvoiceStatus};
pub use project::{Project, ProjectStatus};
pub use staff::Staff;
pub use task::{Priority, Task, TaskStatus};
pub use time_log::TimeLogEntry;

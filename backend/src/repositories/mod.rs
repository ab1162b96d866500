pub mod common;
pub mod employee;
pub mod holiday;
pub mod leave_record;
pub mod policy;
pub mod punch_event;
pub mod transaction;

pub use employee::EmployeeRepository;
pub use holiday::HolidayRepository;
pub use leave_record::LeaveRecordRepository;
pub use policy::PolicyRepository;
pub use punch_event::{PunchEventRepository, PunchEventRepositoryTrait};

pub mod appointments;
pub mod requests;
pub mod slots;

pub use appointments::AppointmentService;
pub use requests::AppointmentRequestService;
pub use slots::TimeSlotService;

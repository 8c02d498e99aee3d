pub mod absence_picker;
pub mod assessment_form;
pub mod class_log_form;
pub mod class_log_week;
pub mod day_carousel;
pub mod directory;
pub mod header;
pub mod notice_banner;
pub mod sign_in;
pub mod timetable_grid;

pub use assessment_form::AssessmentForm;
pub use class_log_week::ClassLogWeek;
pub use directory::Directory;
pub use header::{Header, Tab};
pub use sign_in::SignIn;
pub use timetable_grid::TimetableGrid;

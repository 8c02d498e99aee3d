pub mod use_class_log_form;
pub mod use_class_logs;
pub mod use_departments;
pub mod use_is_mobile;
pub mod use_notice_board;
pub mod use_notice_timer;
pub mod use_timetable;

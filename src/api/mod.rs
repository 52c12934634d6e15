pub mod attendance_correction;

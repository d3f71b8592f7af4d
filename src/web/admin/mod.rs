pub mod marks;
pub mod roster;
pub mod students;

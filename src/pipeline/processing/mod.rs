// Pure record stages: evidence extraction, cleaning, revenue filtering, classification

pub mod classify;
pub mod clean;
pub mod evidence;
pub mod revenue;

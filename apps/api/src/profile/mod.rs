// Profile Collector: gathers the student form and hands over an immutable Profile.

pub mod catalog;
pub mod collector;

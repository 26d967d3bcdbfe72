// Wizard Controller: credential → profile → quiz → results, one Session per student.

pub mod controller;
pub mod handlers;
pub mod session;
pub mod store;

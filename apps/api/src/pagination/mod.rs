// Corpus pagination: serial identifier assignment, order-independent composition.

pub mod driver;
pub mod handlers;

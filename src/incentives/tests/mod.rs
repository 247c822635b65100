mod common;

mod compliance;
mod history;

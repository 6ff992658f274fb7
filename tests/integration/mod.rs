//! End-to-end tests driving the public edit and write entry points against
//! real temporary directories.

mod edit_flow;
mod write_flow;

// Console front end: the stdin loop, input parsing, and text rendering,
// exposed as a library so they can be unit tested apart from the binary.

pub mod console;
pub mod input;
pub mod render;

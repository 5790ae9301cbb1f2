pub mod canvas;
pub mod controller;
pub mod fluent;

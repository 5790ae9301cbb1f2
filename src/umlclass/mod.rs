pub mod umlclass_controllers;
pub mod umlclass_models;

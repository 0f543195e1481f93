//! Command line access to the blog content and the car price service.

pub mod cli;
pub mod commands;

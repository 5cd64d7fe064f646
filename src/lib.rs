//! Request parameter binding demonstrated by one handler per binding strategy.

pub mod controller;
pub mod hello;

#![allow(dead_code)]

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate quick_error;

#[cfg(test)]
extern crate pretty_assertions;

pub mod config;
pub mod cpu;
pub mod gpu;
pub mod hex;
pub mod invaders;
pub mod machine;
pub mod memory;
pub mod string;
pub mod tools;

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

pub mod cli;
pub mod configuration;
pub mod dao;
pub mod error;
pub mod helpers;
pub mod migration;
pub mod model;
pub mod provider;

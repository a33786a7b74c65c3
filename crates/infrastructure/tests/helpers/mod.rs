#![allow(dead_code)]

pub mod intercept_server;

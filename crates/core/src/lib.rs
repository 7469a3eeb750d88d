#![deny(warnings)]

pub mod config;
pub mod error;
pub mod features;
pub mod fusion;
pub mod mfcc;
pub mod model;
pub mod pipeline;
pub mod prosody;
pub mod quality;
pub mod scoring;
pub mod session;
pub mod spectral;

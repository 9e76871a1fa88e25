//! Types shared between the upload controller and its front ends: the file
//! model, the `/process` wire contract and the failure taxonomy.

pub mod domain;
pub mod error;
pub mod protocol;

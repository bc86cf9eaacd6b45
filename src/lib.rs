//! userdata-rs library
//!
//! This crate generates EC2 user-data bootstrap scripts for containerized
//! workloads: install a container runtime and the AWS CLI, authenticate to
//! ECR, pull an image, and run it detached.
//!
//! # Design Principles
//!
//! - **Safety First**: No unsafe code (`#![forbid(unsafe_code)]`)
//! - **Pure Rendering**: script generation never touches the network or
//!   the filesystem; identical inputs produce byte-identical output
//! - **Shell-Safe**: every value embedded in a script goes through POSIX
//!   quoting, so credentials and environment values cannot corrupt it

pub mod encode;
pub mod image;
pub mod manifest;
pub mod os;
pub mod session;
pub mod shell;
pub mod userdata;
pub mod volume;

mod error;

pub use error::UserDataError;

pub use image::ImageRef;
pub use manifest::FleetManifest;
pub use os::OsFamily;
pub use session::{CredentialContext, Session};
pub use userdata::{ContainerFleet, UserData};

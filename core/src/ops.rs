//! # Operation Library
//!
//! Named fleet operations, each a [`DeviceAction`](crate::executor::DeviceAction)
//! composed from the session seam. Errors that make the whole operation
//! meaningless (a missing local file) surface here, before any device is
//! contacted; per-device errors stay inside the fan-out.

use std::path::PathBuf;

use thiserror::Error;

pub mod execute;
pub mod firmware;
pub mod recipe;
pub mod upload;

pub use execute::ExecuteCommand;
pub use firmware::{update_firmware, update_services};
pub use recipe::{ServiceVerb, load_recipe, recipe_list, recipe_service};
pub use upload::UploadFile;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("local file {} not found", .0.display())]
    LocalFileMissing(PathBuf),
    #[error("cannot resolve local path {}: {reason}", .path.display())]
    LocalPath { path: PathBuf, reason: String },
}

use thiserror::Error;

use crate::installer::{InstallError, ToolError};

#[derive(Debug, Error, Clone)]
pub enum StreamedError {
    #[error(transparent)]
    InstallError(#[from] InstallError),

    #[error(transparent)]
    ToolError(#[from] ToolError),
}

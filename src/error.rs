// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Failures local to a single render call. A missing rendering backend is
/// not one of them: those calls return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write chart {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rendering {} failed: {message}", path.display())]
    Render { path: PathBuf, message: String },
}

impl ChartError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ChartError::CreateDir { path, .. }
            | ChartError::Write { path, .. }
            | ChartError::Render { path, .. } => path,
        }
    }
}

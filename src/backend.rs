// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ChartResult;
use crate::figure::Figure;

/// The drawing capability the engine depends on.
pub trait RenderBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this backend produces files at all.
    fn is_available(&self) -> bool;

    /// Rasterize `figure` into `path`, returning the written path, or
    /// `None` when the backend produces nothing.
    fn render(&self, figure: &Figure, path: &Path) -> ChartResult<Option<PathBuf>>;
}

/// Stand-in used when no raster backend is present: never touches disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

impl RenderBackend for NoopBackend {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn render(&self, _figure: &Figure, _path: &Path) -> ChartResult<Option<PathBuf>> {
        Ok(None)
    }
}

/// Pick the best backend this build and host support.
pub fn detect_backend() -> Box<dyn RenderBackend> {
    #[cfg(feature = "bitmap-backend")]
    {
        if crate::bitmap::PlottersBackend::probe() {
            return Box::new(crate::bitmap::PlottersBackend);
        }
        warn!("no usable sans-serif font found, charts will not be rendered");
    }

    #[cfg(not(feature = "bitmap-backend"))]
    warn!("built without bitmap-backend, charts will not be rendered");

    Box::new(NoopBackend)
}

/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense matrix kernel for portfolio math.
//!
//! This crate gathers the workspace crates under one roof and hosts the
//! `portmat` diagnostic driver.

#[macro_use]
extern crate log;

pub use ::portmat_config as config;
pub use ::portmat_linalg as linalg;
pub use ::portmat_random as random;
pub use ::portmat_stats as stats;

pub use ::portmat_linalg::{Matrix, MatrixError};

pub mod entry_points;

pub mod ui {
    pub mod logging;
}

use ::thiserror::Error;

/// Failures of the command-line driver.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("could not read input")]
    Io(#[from] ::std::io::Error),
    #[error("invalid JSON")]
    Json(#[from] ::serde_json::Error),
    #[error("invalid settings")]
    Yaml(#[from] ::serde_yaml::Error),
    #[error("matrix operation failed")]
    Matrix(#[from] MatrixError),
    #[error("could not install the logger")]
    Logger(#[from] ::log::SetLoggerError),
}

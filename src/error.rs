// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types

use thiserror::Error;

/// Errors raised while constructing or evaluating a geometry tree
#[derive(Debug, Error)]
pub enum Error {
    /// A node was constructed with parameters that cannot describe geometry
    #[error("invalid parameter for {shape}: {reason}")]
    InvalidParameter {
        shape: &'static str,
        reason: String,
    },

    /// An anchor was resolved against a subtree that never defined it
    #[error("anchor {0} is not defined in the evaluated subtree")]
    UndefinedAnchor(String),

    /// A deferred node's builder closure failed
    #[error("deferred node failed: {0}")]
    Deferred(String),

    /// Evaluation configuration could not be loaded or saved
    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a failure raised inside a deferred node's builder
    pub fn deferred(reason: impl std::fmt::Display) -> Self {
        Self::Deferred(reason.to_string())
    }

    pub(crate) fn invalid(shape: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            shape,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

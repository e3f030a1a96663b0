use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A program or configuration document could not be decoded.
#[derive(Debug, Error)]
#[error("malformed document: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// The structured outcome handed to the playback client.
///
/// Exactly one of the two shapes is produced: a successful run carries a
/// scene and no errors, a failed run carries errors and no scene. Warnings
/// may accompany either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub success: bool,
    pub scene: Option<Scene>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RunReport {
    /// A completed run.
    pub fn completed(scene: Scene, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            scene: Some(scene),
            errors: Vec::new(),
            warnings,
        }
    }

    /// A run aborted by one or more fatal errors. No partial scene is kept.
    pub fn failed(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            scene: None,
            errors,
            warnings,
        }
    }
}

//! Model sealing utility for obescreen artifacts.
//!
//! Checks that `model.json` loads as a classifier and records its SHA-256
//! in `metadata.json` (`model_sha256`), so the app refuses a model file
//! that was corrupted or swapped after export.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin seal_model -- <model_dir> [--version <version>]
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use obescreen::adapters::pipeline::{
    sha256_hex, ExportedPipeline, PipelineModel, METADATA_FILE, MODEL_FILE,
};
use serde_json::Value;

fn usage() -> String {
    "Usage: seal_model <model_dir> [--version <version>]".to_string()
}

fn parse_args() -> Result<(PathBuf, Option<String>), String> {
    let mut args = env::args().skip(1);
    let mut model_dir: Option<PathBuf> = None;
    let mut version: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" => {
                let v = args.next().ok_or_else(usage)?;
                if v.trim().is_empty() {
                    return Err("--version must not be empty".to_string());
                }
                version = Some(v.trim().to_string());
            }
            "-h" | "--help" => return Err(usage()),
            _ => {
                if model_dir.is_none() {
                    model_dir = Some(PathBuf::from(arg));
                } else {
                    return Err(usage());
                }
            }
        }
    }

    let model_dir = model_dir.ok_or_else(usage)?;
    Ok((model_dir, version))
}

fn main() -> Result<(), String> {
    let (model_dir, version) = parse_args()?;

    let model_dir = if model_dir.is_file() {
        model_dir
            .parent()
            .ok_or_else(|| "Model path has no parent directory".to_string())?
            .to_path_buf()
    } else {
        model_dir
    };

    let model_path = model_dir.join(MODEL_FILE);
    let model_bytes =
        fs::read(&model_path).map_err(|e| format!("Failed to read {model_path:?}: {e}"))?;

    // Refuse to seal something the app could not load anyway.
    let pipeline: ExportedPipeline = serde_json::from_slice(&model_bytes)
        .map_err(|e| format!("Invalid {MODEL_FILE}: {e}"))?;
    let model = PipelineModel::new(pipeline).map_err(|e| format!("Invalid {MODEL_FILE}: {e}"))?;

    let metadata_path = model_dir.join(METADATA_FILE);
    let raw = fs::read(&metadata_path)
        .map_err(|e| format!("Failed to read {metadata_path:?}: {e}"))?;
    let mut metadata: Value = serde_json::from_slice(&raw)
        .map_err(|e| format!("Invalid {METADATA_FILE}: {e}"))?;
    let fields = metadata
        .as_object_mut()
        .ok_or_else(|| format!("{METADATA_FILE} must be a JSON object"))?;

    let digest = sha256_hex(&model_bytes);
    fields.insert("model_sha256".to_string(), Value::String(digest.clone()));
    if let Some(v) = version {
        fields.insert("version".to_string(), Value::String(v));
    }

    let mut out = serde_json::to_vec_pretty(&metadata)
        .map_err(|e| format!("Failed to serialize {METADATA_FILE}: {e}"))?;
    out.push(b'\n');
    fs::write(&metadata_path, &out)
        .map_err(|e| format!("Failed to write {metadata_path:?}: {e}"))?;

    println!("Model inputs: {}", model.width());
    println!("Sealed {metadata_path:?}");
    println!("model_sha256={digest}");

    Ok(())
}

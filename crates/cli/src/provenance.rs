use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where a report came from: code revision, library version, the call site
/// that produced it and the parameters it was run with.
#[derive(Debug, Serialize)]
pub struct Provenance {
    pub code_rev: String,
    pub version: &'static str,
    pub callsite: Callsite,
    pub params: Value,
    pub outputs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

impl Provenance {
    #[track_caller]
    pub fn new(params: Value) -> Self {
        let callsite = Location::caller();
        Self {
            code_rev: current_git_rev(),
            version: hypersimplex::VERSION,
            callsite: Callsite {
                file: callsite.file(),
                line: callsite.line(),
            },
            params,
            outputs: Vec::new(),
        }
    }
}

/// Write `<artifact>.provenance.json` next to `artifact`, recording it as the output.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut prov: Provenance) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    prov.outputs = vec![artifact.to_string_lossy().into_owned()];
    fs::write(&path, serde_json::to_vec_pretty(&prov)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("report"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` at build time, then at run time, then `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_path_rewrites_extension() {
        let derived = sidecar_path(Path::new("/tmp/out/delta-4-2.json"));
        assert_eq!(derived, Path::new("/tmp/out/delta-4-2.provenance.json"));
    }

    #[test]
    fn write_sidecar_records_output_and_params() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("r.json");
        let prov = Provenance::new(json!({"d": 4, "k": 2}));
        let path = write_sidecar(&artifact, prov).unwrap();
        assert!(path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["params"]["k"], 2);
        assert_eq!(parsed["version"], hypersimplex::VERSION);
        assert!(parsed["callsite"]["line"].as_u64().unwrap() > 0);
    }
}

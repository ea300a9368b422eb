//! Shared helpers for classfold integration tests.
//!
//! Every test works in its own temp directory laid out like a small build:
//!
//! ```text
//! <tmp>/
//! ├── build/classes/java/main/     ← watched input root
//! ├── build/classes/kotlin/main/   ← watched input root
//! └── build/intermediates/incremental/classfoldCopyOutput/  ← default output root
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use classfold::change::{RawChangeType, RawFileType, RawObservation};
use tempfile::TempDir;

pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::create_dir_all(dir.path().join("build/classes/java/main")).unwrap();
        fs::create_dir_all(dir.path().join("build/classes/kotlin/main")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn java_root(&self) -> PathBuf {
        self.path().join("build/classes/java/main")
    }

    pub fn kotlin_root(&self) -> PathBuf {
        self.path().join("build/classes/kotlin/main")
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        vec![self.java_root(), self.kotlin_root()]
    }

    pub fn output_root(&self) -> PathBuf {
        self.path()
            .join("build/intermediates/incremental/classfoldCopyOutput")
    }

    /// Write a compiled class under `root` and return its absolute path.
    pub fn write_class(&self, root: &Path, relative: &str, content: &[u8]) -> PathBuf {
        let p = root.join(relative);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, content).unwrap();
        p
    }

    /// Write `classfold.toml` watching both compiler roots.
    pub fn write_config(&self, extra: &str) {
        let config = format!(
            "[inputs]\nroots = [{:?}, {:?}]\n\n{extra}",
            self.java_root().display().to_string(),
            self.kotlin_root().display().to_string(),
        );
        fs::write(self.path().join("classfold.toml"), config).unwrap();
    }

    pub fn output_file(&self, relative: &str) -> PathBuf {
        self.output_root().join(relative)
    }
}

pub fn observe(file: &Path, change: RawChangeType, file_type: RawFileType) -> RawObservation {
    RawObservation {
        file: file.to_owned(),
        normalized_path: None,
        change,
        file_type,
    }
}

pub fn added(file: &Path) -> RawObservation {
    observe(file, RawChangeType::Added, RawFileType::File)
}

pub fn modified(file: &Path) -> RawObservation {
    observe(file, RawChangeType::Modified, RawFileType::File)
}

pub fn removed(file: &Path) -> RawObservation {
    observe(file, RawChangeType::Removed, RawFileType::Missing)
}

/// Write observations as the JSON change file the CLI reads.
pub fn write_changes(dir: &Path, observations: &[RawObservation]) -> PathBuf {
    let p = dir.join("changes.json");
    fs::write(&p, serde_json::to_string_pretty(observations).unwrap()).unwrap();
    p
}

pub fn classfold_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_classfold"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("CLASSFOLD_CONFIG")
        .env("CLASSFOLD_LOG", "off")
        .output()
        .expect("failed to execute classfold")
}

/// Run classfold and assert it succeeds. Returns stdout as string.
pub fn classfold_ok(dir: &Path, args: &[&str]) -> String {
    let out = classfold_in(dir, args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "classfold {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" ")
    );
    stdout.into_owned()
}

/// Run classfold and assert it fails. Returns stderr as string.
pub fn classfold_fail(dir: &Path, args: &[&str]) -> String {
    let out = classfold_in(dir, args);
    assert!(
        !out.status.success(),
        "classfold {} unexpectedly succeeded:\nstdout: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stdout)
    );
    String::from_utf8_lossy(&out.stderr).into_owned()
}

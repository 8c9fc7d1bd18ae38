//! File-based report store implementation

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::{ReportError, ReportResult};
use super::traits::DriftReportStore;
use super::types::{DriftReport, ReportStream};

/// Writes `<stem>.html` and `<stem>.json` per stream into one directory.
///
/// The JSON document holds the whole report and is written last; loading
/// reads only it. The HTML file is a browsable copy of the artifact.
#[derive(Debug, Clone)]
pub struct FsReportStore {
    dir: PathBuf,
}

impl FsReportStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> ReportResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| ReportError::Io { path: dir.clone(), source })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the HTML artifact for `stream`
    pub fn html_path(&self, stream: ReportStream) -> PathBuf {
        self.dir.join(format!("{}.html", stream.stem()))
    }

    /// Path of the JSON metadata for `stream`
    pub fn json_path(&self, stream: ReportStream) -> PathBuf {
        self.dir.join(format!("{}.json", stream.stem()))
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> ReportResult<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = fs::write(&tmp, contents)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|source| ReportError::Io { path: path.to_path_buf(), source });
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn read_optional(path: &Path) -> ReportResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ReportError::Io { path: path.to_path_buf(), source }),
    }
}

impl DriftReportStore for FsReportStore {
    fn save(&self, stream: ReportStream, report: &DriftReport) -> ReportResult<()> {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;
        write_atomic(&self.html_path(stream), report.artifact.html.as_bytes())?;
        // Commit point: a failure before this rename leaves the previous report loadable.
        write_atomic(&self.json_path(stream), json.as_bytes())
    }

    fn load(&self, stream: ReportStream) -> ReportResult<Option<DriftReport>> {
        let Some(json) = read_optional(&self.json_path(stream))? else {
            return Ok(None);
        };
        let report = serde_json::from_str(&json).map_err(|e| ReportError::Serialization(e.to_string()))?;
        Ok(Some(report))
    }
}

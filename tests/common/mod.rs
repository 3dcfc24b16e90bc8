#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use notes_dashboard::{data::RawValue, rows::RawTable};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes a file and stamps its modification time `age_secs` in the past.
    pub fn write_aged(&self, name: &str, contents: &str, age_secs: u64) -> PathBuf {
        let path = self.write(name, contents);
        let file = File::options()
            .write(true)
            .open(&path)
            .expect("reopen temp file");
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .expect("set modified time");
        path
    }
}

/// Builds a raw table from text cells, the way the CSV loader would.
pub fn text_table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| RawValue::from_text(cell)).collect())
            .collect(),
    )
    .expect("rectangular table")
}

pub const NOTES_CSV: &str = "\
笔记标题,发布时间,笔记类型,曝光量,阅读量,点击率,点赞数,评论数,收藏数,涨粉数,分享数,平均阅读时长
早餐分享｜一周不重样,2024-03-15 10:00:00,图文,\"12,000\",1500,12.5%,320,12,88,15,9,35
通勤护肤 快速上妆,2024/04/02,视频,8000,900,11.25%,210,8,40,30,5,48
,2024-04-03,图文,100,10,10%,999,0,0,0,0,0
早餐分享第二弹,2024-03-28,图文,abc,,N/A,150,3,20,2,1,20
";

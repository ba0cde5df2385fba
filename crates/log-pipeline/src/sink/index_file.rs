//! JSON Lines 파일 인덱스
//!
//! 인덱스 하나를 `<dir>/<index>.jsonl` 파일 하나로 저장합니다.
//! 스키마는 `<dir>/<index>.mapping.json`에 한 번만 기록합니다.

use std::path::{Path, PathBuf};

use logdrop_core::error::SinkError;
use logdrop_core::pipeline::{IndexSchemaProvider, IndexSink};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// 파일 기반 인덱스 싱크
///
/// 동시 upsert가 한 줄씩 온전히 기록되도록 쓰기를 직렬화합니다.
#[derive(Debug)]
pub struct JsonLinesIndexSink {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesIndexSink {
    /// 디렉토리로 싱크를 생성합니다. 디렉토리는 첫 기록 시 생성됩니다.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 인덱스 디렉토리
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 인덱스 문서 파일 경로
    pub fn documents_path(&self, index: &str) -> PathBuf {
        self.dir.join(format!("{index}.jsonl"))
    }

    /// 인덱스 매핑 파일 경로
    pub fn mapping_path(&self, index: &str) -> PathBuf {
        self.dir.join(format!("{index}.mapping.json"))
    }

    async fn append(&self, index: &str, line: &[u8]) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.documents_path(index))
            .await?;
        file.write_all(line).await?;
        file.flush().await
    }
}

impl IndexSink for JsonLinesIndexSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn upsert(&self, index: &str, document: &serde_json::Value) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(document).map_err(|e| SinkError::Index {
            index: index.to_owned(),
            reason: e.to_string(),
        })?;
        line.push(b'\n');

        self.append(index, &line)
            .await
            .map_err(|e| SinkError::Index {
                index: index.to_owned(),
                reason: e.to_string(),
            })
    }
}

impl IndexSchemaProvider for JsonLinesIndexSink {
    async fn ensure_index(&self, index: &str, mapping: &serde_json::Value) -> Result<(), SinkError> {
        let schema_err = |reason: String| SinkError::Schema {
            index: index.to_owned(),
            reason,
        };

        let path = self.mapping_path(index);
        let _guard = self.write_lock.lock().await;

        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| schema_err(e.to_string()))?
        {
            tracing::debug!(index, "index already exists");
            return Ok(());
        }

        let body = serde_json::to_vec_pretty(mapping).map_err(|e| schema_err(e.to_string()))?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| schema_err(e.to_string()))?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| schema_err(e.to_string()))?;

        tracing::info!(index, path = %path.display(), "created index");
        Ok(())
    }
}

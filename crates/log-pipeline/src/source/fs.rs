//! 로컬 디렉토리 오브젝트 소스
//!
//! `<root>/<bucket>/<key>` 파일을 오브젝트로 취급합니다.
//! 로컬 개발과 CLI 실행에 사용합니다.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use logdrop_core::error::SourceError;
use logdrop_core::pipeline::ObjectSource;

/// 로컬 파일 시스템 오브젝트 소스
#[derive(Debug, Clone)]
pub struct LocalObjectSource {
    root: PathBuf,
}

impl LocalObjectSource {
    /// 루트 디렉토리로 소스를 생성합니다.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 루트 디렉토리
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 버킷/키를 파일 경로로 변환합니다.
    ///
    /// 절대 경로나 `..` 컴포넌트로 루트를 벗어나는 키는 거부합니다.
    pub fn resolve(&self, bucket: &str, key: &str) -> Result<PathBuf, SourceError> {
        for (part, value) in [("bucket", bucket), ("key", key)] {
            if value.is_empty() {
                return Err(SourceError::InvalidKey {
                    key: format!("{bucket}/{key}"),
                    reason: format!("{part} must not be empty"),
                });
            }
            let escapes = Path::new(value).components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
            if escapes {
                return Err(SourceError::InvalidKey {
                    key: format!("{bucket}/{key}"),
                    reason: format!("{part} must stay inside the object root"),
                });
            }
        }
        Ok(self.root.join(bucket).join(key))
    }
}

impl ObjectSource for LocalObjectSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn fetch(&self, bucket: &str, key: &str) -> Result<Bytes, SourceError> {
        let path = self.resolve(bucket, key)?;
        tracing::debug!(path = %path.display(), "reading object");

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SourceError::NotFound {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            }),
            Err(e) => Err(SourceError::Transient {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }
}

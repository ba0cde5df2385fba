//! gzip 압축 해제
//!
//! 키가 `.gz`로 끝나는 오브젝트를 해제합니다. 여러 멤버가 이어 붙은
//! gzip 스트림도 끝까지 읽습니다.

use std::io::Read;

use bytes::Bytes;
use flate2::read::MultiGzDecoder;
use logdrop_core::error::SourceError;
use logdrop_core::pipeline::Decompressor;

/// 해제 결과 기본 최대 크기 (512MB)
pub const DEFAULT_MAX_OUTPUT_BYTES: u64 = 512 * 1024 * 1024;

/// gzip 압축 해제기
///
/// 해제는 동기적으로 최대 `max_output_bytes`까지 읽습니다. 처리기는 이 작업을
/// 블로킹 스레드 풀에서 실행합니다.
#[derive(Debug, Clone)]
pub struct GzipDecompressor {
    max_output_bytes: u64,
}

impl GzipDecompressor {
    /// 기본 한도로 생성합니다.
    pub fn new() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    /// 해제 결과 최대 크기를 설정합니다.
    pub fn with_max_output_bytes(mut self, limit: u64) -> Self {
        self.max_output_bytes = limit;
        self
    }
}

impl Default for GzipDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor for GzipDecompressor {
    fn applies_to(&self, key: &str) -> bool {
        key.ends_with(".gz")
    }

    fn decompress(&self, data: Bytes) -> Result<Bytes, SourceError> {
        let mut out = Vec::new();
        // 한도 + 1 바이트까지 읽어 초과 여부를 판별
        MultiGzDecoder::new(&data[..])
            .take(self.max_output_bytes.saturating_add(1))
            .read_to_end(&mut out)
            .map_err(|e| SourceError::Decompress(e.to_string()))?;

        if out.len() as u64 > self.max_output_bytes {
            return Err(SourceError::Decompress(format!(
                "decompressed size exceeds {} bytes",
                self.max_output_bytes
            )));
        }

        Ok(Bytes::from(out))
    }
}

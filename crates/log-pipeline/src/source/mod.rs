//! 오브젝트 소스와 압축 해제기 구현
//!
//! - [`LocalObjectSource`]: `<root>/<bucket>/<key>` 로컬 파일
//! - [`GzipDecompressor`]: `.gz` 오브젝트 해제

pub mod fs;
pub mod gzip;

pub use fs::LocalObjectSource;
pub use gzip::GzipDecompressor;

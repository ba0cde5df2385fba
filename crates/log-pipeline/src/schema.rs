//! 인덱스 필드 매핑
//!
//! 세 인덱스의 필드 타입을 데이터로 정의합니다. 매핑의 필드 이름은
//! [`LogRecord`](crate::record::LogRecord) 직렬화 결과와 같습니다.

use logdrop_core::error::SinkError;
use logdrop_core::pipeline::IndexSchemaProvider;
use logdrop_core::types::LogFamily;
use serde_json::{Value, json};

use crate::dispatch::IndexNames;

/// 로그 계열의 인덱스 매핑
pub fn mapping_for(family: LogFamily) -> Value {
    let properties = match family {
        LogFamily::Error => json!({
            "type": { "type": "keyword" },
            "timestamp": { "type": "date" },
            "message": { "type": "text" },
            "repeat_count": { "type": "integer" }
        }),
        LogFamily::StandardAccess => json!({
            "type": { "type": "keyword" },
            "timestamp": { "type": "date" },
            "version": { "type": "keyword" },
            "ip": { "type": "keyword" },
            "domain": { "type": "keyword" },
            "status": { "type": "integer" },
            "bytes": { "type": "long" },
            "server": { "type": "keyword" },
            "response_time": { "type": "float" },
            "total_time": { "type": "float" },
            "request": { "type": "text" }
        }),
        LogFamily::ApacheAccess => json!({
            "type": { "type": "keyword" },
            "timestamp": { "type": "date" },
            "ip": { "type": "keyword" },
            "request": { "type": "text" },
            "status": { "type": "integer" },
            "bytes": { "type": "long" },
            "referer": { "type": "keyword" },
            "user_agent": { "type": "text" }
        }),
    };

    json!({ "mappings": { "properties": properties } })
}

/// 세 인덱스가 모두 존재하도록 보장합니다.
///
/// 첫 실패에서 중단합니다.
pub async fn ensure_all_indices<P>(provider: &P, indices: &IndexNames) -> Result<(), SinkError>
where
    P: IndexSchemaProvider + ?Sized,
{
    for family in LogFamily::ALL {
        let index = indices.for_family(family);
        provider.ensure_index(index, &mapping_for(family)).await?;
        tracing::debug!(index, %family, "index ready");
    }
    Ok(())
}

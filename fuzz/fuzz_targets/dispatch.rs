#![no_main]

use libfuzzer_sys::fuzz_target;
use logdrop_core::types::LogFamily;
use logdrop_pipeline::DispatchPolicy;

fuzz_target!(|key: &str| {
    let policy = DispatchPolicy::default();
    let dispatch = policy.select(key);

    // 에러 디렉토리 표식은 항상 우선한다
    if format!("/{key}").contains("/error/") {
        assert_eq!(dispatch.family, LogFamily::Error);
    }
});

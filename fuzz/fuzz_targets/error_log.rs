#![no_main]

use logdrop_pipeline::parser::ErrorLogParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|line: &str| {
    let Ok(parser) = ErrorLogParser::new() else {
        return;
    };

    // 패닉 없이 Parsed 또는 Rejected를 반환해야 한다
    if let Some(record) = parser.parse(line).parsed() {
        assert!(record.repeat_count >= 1);
    }
});

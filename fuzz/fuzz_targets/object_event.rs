#![no_main]

use libfuzzer_sys::fuzz_target;
use logdrop_core::event::{ObjectEvent, decode_key};

fuzz_target!(|data: &str| {
    let _ = ObjectEvent::from_json(data);

    // 디코딩에 성공하면 `%`가 없는 키는 그대로여야 한다
    if let Ok(decoded) = decode_key(data) {
        if !data.contains('%') {
            assert_eq!(decoded, data);
        }
    }
});

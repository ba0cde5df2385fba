#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use logdrop_pipeline::{TimestampEncoding, normalize};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    raw: &'a str,
    apache: bool,
}

fuzz_target!(|input: Input<'_>| {
    let encoding = if input.apache {
        TimestampEncoding::ApacheStyle
    } else {
        TimestampEncoding::Iso8601
    };
    let _ = normalize(input.raw, encoding);
});

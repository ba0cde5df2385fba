#![no_main]

use logdrop_pipeline::parser::AccessLogParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|line: &str| {
    let _ = AccessLogParser.parse(line);
});

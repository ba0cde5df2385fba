#![no_main]

use logdrop_pipeline::parser::ApacheLogParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|line: &str| {
    let Ok(parser) = ApacheLogParser::new() else {
        return;
    };
    let _ = parser.parse(line);
});

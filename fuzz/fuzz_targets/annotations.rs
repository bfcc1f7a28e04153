#![no_main]

use eule_harness::{AnnotationParser, check_err, check_out};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fixtures and subject output are both decoded lossily
    let text = String::from_utf8_lossy(data);
    let Ok(parser) = AnnotationParser::new("#") else {
        return;
    };
    let expectations = parser.parse(&text);
    // Feed the fixture back in as if it were the subject's output
    let _ = check_out(&text, &expectations.output);
    let _ = check_err(&text, &expectations.error);
});

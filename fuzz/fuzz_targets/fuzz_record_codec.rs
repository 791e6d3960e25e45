//! Fuzz target for the switch record line codec.
//!
//! Arbitrary lines must decode or fail cleanly, and anything that decodes
//! must re-encode to a line that decodes to the same record.

#![no_main]

use formgate::catalog::SwitchRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(record) = SwitchRecord::from_line(data) else {
        return;
    };

    let line = record.to_line();
    assert!(!line.contains('\n'), "encoded line contains LF");
    assert!(!line.contains('\r'), "encoded line contains CR");

    let again = SwitchRecord::from_line(&line).expect("re-encoded record must decode");
    assert_eq!(again, record);
});

//! JIDL fuzz target: feed arbitrary bytes to the textual-notation parser.
//! The parser must not panic; it should return Ok(Schema) or a SchemaError.
//! Build with: cargo fuzz run jidl_loads (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(schema) = jadn::jidl::loads(s) {
        let _ = jadn::check(schema);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run jidl_loads");
}

//! Fuzz target for the form validation filter.
//!
//! Any body must produce a verdict without panicking, and accepted bodies
//! must be replayed byte for byte.

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use formgate::catalog::{AllowedValues, Category};
use formgate::filter::{
    BlockedSubstrings, Blocklist, FilterConfig, FilterError, HttpRequestContext,
    RequestValidationFilter, StaticErrorPage, FORM_URLENCODED,
};
use libfuzzer_sys::fuzz_target;

struct FixedBlocklist(Arc<BlockedSubstrings>);

impl Blocklist for FixedBlocklist {
    fn load(&self) -> Result<Arc<BlockedSubstrings>, FilterError> {
        Ok(Arc::clone(&self.0))
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    blocklist: String,
    body: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let Ok(blocked) = BlockedSubstrings::parse(&input.blocklist) else {
        return;
    };

    let catalog = AllowedValues::new()
        .with_values(Category::Platform, ["linux", "windows"])
        .with_values(Category::Architecture, ["x86_64"]);
    let filter = RequestValidationFilter::new(
        Arc::new(catalog),
        Arc::new(FixedBlocklist(Arc::new(blocked))),
        Arc::new(StaticErrorPage::default()),
        FilterConfig { max_body_bytes: 4096 },
    );

    let Ok(mut request) = HttpRequestContext::from_bytes(Some(FORM_URLENCODED), input.body.clone())
    else {
        return;
    };

    let outcome = filter.validate(&mut request).expect("fixed blocklist never fails");
    if outcome.is_accepted() {
        assert!(!request.is_aborted());
        assert_eq!(request.read_entity_to_end().unwrap(), input.body);
    } else {
        assert!(request.is_aborted());
    }
});

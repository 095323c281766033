//! Shared helpers for in-crate tests.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install `env_logger` once per test binary; honours `RUST_LOG`.
pub(crate) fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

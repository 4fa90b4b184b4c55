/*! Integration tests for Graft.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - injection: Tests for the leaf injections (pass-through, convertible, enum, delegate)
 * - store: Tests for collection, composite, strategy and synthesized stores
 * - cache: Tests for the concurrent resolution cache
 * - resolution: Tests for the exact and inheritance resolution strategies
 * - collection: Tests for the collection merger, target finders and enumerable adapters
 * - context: Tests for the target cache, injection trail and cyclic graphs
 * - mapper: Tests for the mapper facade and its configuration
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("graft=info".parse().unwrap()))
        .with_test_writer()
        .try_init();
}

mod collection;
mod context;
mod helpers;
mod resolution;

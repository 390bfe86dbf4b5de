// SPDX-License-Identifier: Apache-2.0 OR MIT
fn main() {
    // Coverage runs set `--cfg tarpaulin`; the binary tests in
    // tests/integration/cli.rs are skipped under it because the child
    // process is not instrumented. Declare the cfg so normal builds
    // don't warn about it.
    println!("cargo:rustc-check-cfg=cfg(tarpaulin)");
}

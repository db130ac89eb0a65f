use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::copy("link.ld", out_dir.join("link.ld")).unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
    // Only the bare-metal image is laid out by hand.
    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("arm") {
        println!("cargo:rustc-link-arg-bins=-Tlink.ld");
    }
    println!("cargo:rerun-if-changed=link.ld");
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ESP-IDF environment is only needed when cross-compiling for the board.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

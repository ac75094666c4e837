// build.rs
//
// Tauri codegen only runs for the desktop shell; the library builds headless.

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}

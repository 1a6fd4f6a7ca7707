use std::path::PathBuf;

fn main() {
    // Tell Cargo to re-run this build script if apps/ changes
    println!("cargo:rerun-if-changed=apps/");

    // The bundled preference modules are embedded with include_dir! in the loader,
    // which needs the directory to exist even when nothing is bundled
    let apps_path = PathBuf::from("apps");
    if !apps_path.exists() {
        std::fs::create_dir_all(&apps_path).expect("Failed to create apps directory");
    }
}

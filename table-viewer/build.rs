use std::fs;
use std::path::Path;

fn main() {
    // include_dir! does not tell cargo about the files it embeds
    println!("cargo:rerun-if-changed=assets");
    track_directory("assets");
}

fn track_directory(directory: &str) {
    let path = Path::new(directory);
    if !path.exists() {
        return;
    }

    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                if let Some(path_string) = entry_path.to_str() {
                    track_directory(path_string);
                }
            } else if let Some(path_string) = entry_path.to_str() {
                println!("cargo:rerun-if-changed={}", path_string);
            }
        }
    }
}

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    // 没有前端构建产物时写入占位页，保证 rust-embed 能编译
    if !dist_path.join("index.html").exists() {
        println!("cargo:warning=frontend/dist not found, embedding placeholder page");
        create_placeholder(&dist_path);
    }
}

fn create_placeholder(dist_path: &Path) {
    fs::create_dir_all(dist_path.join("assets")).expect("Failed to create dist directory");

    let placeholder = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>%SYSTEM_NAME%</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 640px; margin: 80px auto; padding: 0 20px; }
        code { background: #f1f3f4; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>%SYSTEM_NAME%</h1>
    <p>The API is running, but no frontend was embedded in this build.</p>
    <p>Build the frontend into <code>frontend/dist</code> and rebuild the server.</p>
</body>
</html>"#;

    fs::write(dist_path.join("index.html"), placeholder)
        .expect("Failed to write placeholder index.html");
}

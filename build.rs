//! Build script that checks for required system libraries and points at
//! the right packages when they are missing.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");

    check_pkg_config();
    check_opencv();
    check_x11();
}

fn pkg_config(args: &[&str]) -> Option<String> {
    let output = Command::new("pkg-config").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn check_pkg_config() {
    if pkg_config(&["--version"]).is_none() {
        println!("cargo:warning=pkg-config not found. It is required to locate system libraries.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install pkg-config");
    }
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    let version = pkg_config(&["--modversion", "opencv4"]).or_else(|| pkg_config(&["--modversion", "opencv"]));
    match version {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config. Make sure OpenCV is installed.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev");
        }
    }
}

fn check_x11() {
    if !env::var("TARGET").unwrap_or_default().contains("linux") {
        return;
    }
    if pkg_config(&["--exists", "x11"]).is_none() && pkg_config(&["--modversion", "x11"]).is_none() {
        println!("cargo:warning=X11 libraries not found. Cursor control will not work.");
        println!("cargo:warning=On Ubuntu: sudo apt-get install libx11-dev libxtst-dev");
    }
}

//! Build-time hints for locating FFmpeg.
//!
//! `ffmpeg-sys-next` does the actual discovery. On Windows it needs
//! `FFMPEG_DIR`, which is easy to miss, so point at a vcpkg install when one
//! can be found.

use std::{env, path::PathBuf};

const WATCHED_VARIABLES: [&str; 4] = ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_DYNAMIC", "VCPKGRS_TRIPLET"];

fn warn(message: impl AsRef<str>) {
    println!("cargo:warning={}", message.as_ref());
}

fn vcpkg_ffmpeg_dir() -> Option<PathBuf> {
    let root = env::var_os("VCPKG_ROOT")?;
    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    Some(PathBuf::from(root).join("installed").join(triplet))
}

fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    let is_windows = env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "windows");
    if !is_windows || env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    match vcpkg_ffmpeg_dir() {
        None => warn(
            "FFMPEG_DIR is not set. Install FFmpeg (e.g. via vcpkg) and set FFMPEG_DIR to build frame-sampler on Windows.",
        ),
        Some(dir) if dir.exists() => {
            warn(format!(
                "FFMPEG_DIR is not set; found a vcpkg FFmpeg at {0}. Set FFMPEG_DIR={0}.",
                dir.display()
            ));
            if env::var_os("VCPKGRS_DYNAMIC").is_none() {
                warn("Set VCPKGRS_DYNAMIC=1 when linking against a dynamic vcpkg FFmpeg.");
            }
        }
        Some(dir) => warn(format!(
            "VCPKG_ROOT is set but {} does not contain an FFmpeg install.",
            dir.display()
        )),
    }
}

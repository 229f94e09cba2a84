//! End-to-end tests against real FFmpeg binaries.

use std::path::Path;
use std::process::Command;

use clap::Parser;
use tempfile::TempDir;
use vertclip_cli::{run, Args, CliConfig};
use vertclip_media::{FfprobeKeyframeProbe, KeyframeProbe};

/// 10 s test pattern with a tone and a keyframe every 2 s.
fn make_source(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("source.mp4");
    let status = Command::new("ffmpeg")
        .args([
            "-y", "-v", "error", "-f", "lavfi", "-i", "testsrc=size=640x360:rate=30:duration=10",
            "-f", "lavfi", "-i", "sine=frequency=440:duration=10", "-c:v", "libx264", "-g", "60",
            "-keyint_min", "60", "-sc_threshold", "0", "-c:a", "aac", "-shortest",
        ])
        .arg(&path)
        .status()
        .expect("failed to run ffmpeg");
    assert!(status.success());
    path
}

fn probe_dimensions(path: &Path) -> String {
    let output = Command::new("ffprobe")
        .args([
            "-v", "error", "-select_streams", "v:0", "-show_entries", "stream=width,height", "-of",
            "csv=p=0",
        ])
        .arg(path)
        .output()
        .expect("failed to run ffprobe");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Test keyframe probing on a file with a fixed GOP.
#[tokio::test]
#[ignore = "requires FFmpeg"]
async fn test_probe_fixed_gop() {
    let dir = TempDir::new().unwrap();
    let source = make_source(dir.path());

    let probe = FfprobeKeyframeProbe::from_path().expect("ffprobe not found");
    let keyframes = probe.probe_keyframes(&source).await.unwrap();

    assert_eq!(keyframes.len(), 5);
    assert!(keyframes.as_slice().windows(2).all(|w| (w[1] - w[0] - 2.0).abs() < 0.05));
}

/// Test a full run with burned-in subtitles.
#[tokio::test]
#[ignore = "requires FFmpeg"]
async fn test_full_run_with_subtitles() {
    let dir = TempDir::new().unwrap();
    let source = make_source(dir.path());
    let srt = dir.path().join("captions.srt");
    std::fs::write(&srt, "1\n00:00:00,000 --> 00:00:05,000\nHello\n").unwrap();
    let output = dir.path().join("clip.mp4");

    let args = Args::parse_from([
        "vertclip",
        "-i",
        source.to_str().unwrap(),
        "--start",
        "2.5",
        "--end",
        "5.0",
        "--srt",
        srt.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);

    let mut lines = Vec::new();
    let outcome = run(&args, &CliConfig::default(), |l| lines.push(l.to_string()))
        .await
        .unwrap();

    assert!((outcome.aligned.start - 2.0).abs() < 0.05);
    assert!((outcome.aligned.end - 6.0).abs() < 0.05);
    assert!(lines.iter().any(|l| l.starts_with("[CMD] ")));
    assert_eq!(probe_dimensions(&output), "1080,1920");
}

use std::process::Command;

mod common;

use common::vidkit;

#[test]
fn help_lists_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_vidkit"))
        .arg("--help")
        .output()
        .expect("failed to run vidkit --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["frames", "remux", "probe"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
}

#[test]
fn frames_help_shows_defaults() {
    let output = vidkit(["frames", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Output/Frames"));
    assert!(stdout.contains("SampleVideo_1280x720_2mb.mp4"));
    assert!(stdout.contains("pgm"));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nope.mp4");

    for subcommand in ["frames", "remux", "probe"] {
        let mut args = vec![
            subcommand.to_string(),
            "--input".to_string(),
            input.display().to_string(),
        ];
        match subcommand {
            "frames" => args.extend(["--output-dir".into(), dir.path().join("f").display().to_string()]),
            "remux" => args.extend(["--output".into(), dir.path().join("r.ts").display().to_string()]),
            _ => {}
        }

        let output = vidkit(&args);
        assert!(!output.status.success(), "{subcommand} succeeded");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("nope.mp4"), "{subcommand} stderr: {stderr}");
    }
}

#[test]
fn unknown_image_format_is_rejected() {
    let output = vidkit(["frames", "--image-format", "bmp"]);
    assert!(!output.status.success());
}

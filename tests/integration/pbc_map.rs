// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use crate::{get_cmd_output, make_reference_image, read_image, vla_beam};

#[test]
fn test_help_lists_arguments() {
    let cmd = vla_beam().arg("--help").ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    for arg in ["--image", "--max-radius", "--output", "--dry-run", "--save-toml"] {
        assert!(stdout.contains(arg), "{arg} missing from help:\n{stdout}");
    }
}

#[test]
fn test_pbc_map_is_written() {
    let temp_dir = TempDir::new().expect("couldn't make tmp dir");
    // 41 x 41 pixels of 1' each, reference pixel in the middle.
    let image = make_reference_image(&temp_dir, "ref.fits", (41, 41), (21.0, 21.0), 1.0, "arcmin");
    let output = temp_dir.path().join("pbc.fits");

    #[rustfmt::skip]
    let cmd = vla_beam()
        .args([
            "-i", &image.display().to_string(),
            "-r", "15",
            "-o", &output.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "vla_beam failed: {:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(
        stdout.contains(&format!("vla_beam {} (", env!("CARGO_PKG_VERSION"))),
        "{stdout}"
    );
    assert!(stdout.contains("vla_beam complete."), "{stdout}");

    let (shape, data) = read_image(&output);
    assert_eq!(shape, vec![41, 41]);
    // The reference pixel is at (row, col) = (20, 20).
    assert_abs_diff_eq!(data[20 * 41 + 20], 1.0, epsilon = 1e-6);
    // 10' away along a row.
    assert_abs_diff_eq!(
        data[20 * 41 + 30],
        ::vla_beam::vla_pbc(10.0),
        epsilon = 1e-6
    );
    // 20' away is beyond the maximum radius.
    assert!(data[20 * 41 + 40].is_nan());
    assert!(data[0].is_nan());
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().expect("couldn't make tmp dir");
    let image = make_reference_image(&temp_dir, "ref.fits", (9, 9), (5.0, 5.0), 30.0, "arcsec");
    let output = temp_dir.path().join("pbc.fits");

    #[rustfmt::skip]
    let cmd = vla_beam()
        .args([
            "-i", &image.display().to_string(),
            "-r", "40",
            "-o", &output.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "vla_beam failed: {:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run"), "{stdout}");
    assert!(!output.exists());
}

#[test]
fn test_args_file_and_save_toml() {
    let temp_dir = TempDir::new().expect("couldn't make tmp dir");
    let image = make_reference_image(&temp_dir, "ref.fits", (9, 9), (5.0, 5.0), 30.0, "arcsec");
    let output = temp_dir.path().join("pbc.fits");
    let args_file = temp_dir.path().join("args.toml");
    std::fs::write(
        &args_file,
        format!(
            "image = {:?}\nmax_radius = 40.0\noutput = {:?}\n",
            image.display().to_string(),
            output.display().to_string()
        ),
    )
    .unwrap();
    let saved = temp_dir.path().join("saved.toml");

    let cmd = vla_beam()
        .args([
            &args_file.display().to_string(),
            "--save-toml",
            &saved.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "vla_beam failed: {:?}", get_cmd_output(cmd));
    assert!(output.exists());

    let saved = std::fs::read_to_string(saved).unwrap();
    assert!(saved.contains("max_radius = 40.0"), "{saved}");
    assert!(saved.contains("ref.fits"), "{saved}");
}

#[test]
fn test_unrecognised_units_fail() {
    let temp_dir = TempDir::new().expect("couldn't make tmp dir");
    let image = make_reference_image(&temp_dir, "ref.fits", (9, 9), (5.0, 5.0), 0.001, "rad");
    let output = temp_dir.path().join("pbc.fits");

    #[rustfmt::skip]
    let cmd = vla_beam()
        .args([
            "-i", &image.display().to_string(),
            "-r", "40",
            "-o", &output.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("CUNIT1 is 'rad'"), "{stderr}");
    assert!(!output.exists());
}

#[test]
fn test_missing_image_fails() {
    let cmd = vla_beam().args(["-r", "40"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No reference image"), "{stderr}");
}

use std::{io::Write, path::Path};

fn cargo(args: &str) {
    println!("cargo {args}");

    let status = std::process::Command::new("cargo")
        .args(args.split_whitespace())
        .status()
        .expect("failed to execute cargo");

    assert!(status.success(), "command 'cargo {args}' failed");
}

/// Write a flat grid of points to a PLY file for the demo to pick on.
fn write_grid_model(path: &Path, side: u32) {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path).expect("create model"));

    write!(
        file,
        "ply\n\
        format binary_little_endian 1.0\n\
        element vertex {}\n\
        property float x\n\
        property float y\n\
        property float z\n\
        property uchar red\n\
        property uchar green\n\
        property uchar blue\n\
        property uchar alpha\n\
        end_header\n",
        side * side
    )
    .expect("write header");

    for i in 0..side {
        for j in 0..side {
            for coord in [i as f32, j as f32, 0.0] {
                file.write_all(&coord.to_le_bytes()).expect("write position");
            }
            file.write_all(&[255, 255, 255, 255]).expect("write color");
        }
    }
}

/// Count the instrumented and the executed lines of a lcov report.
fn line_coverage(lcov: &str) -> (u64, u64) {
    lcov.lines()
        .filter_map(|line| line.strip_prefix("DA:"))
        .filter_map(|data| data.split(',').nth(1)?.parse::<u64>().ok())
        .fold((0, 0), |(covered, total), hits| {
            (covered + (hits != 0) as u64, total + 1)
        })
}

fn main() {
    let exe_path = std::env::current_exe().expect("current exe");

    let manifest_dir = exe_path
        .ancestors()
        .find(|dir| dir.join("Cargo.toml").is_file())
        .expect("manifest directory");

    let coverage_dir = manifest_dir.join("coverage");
    let lcov_path = coverage_dir.join("lcov.info");
    let badge_path = coverage_dir.join("badge.json");
    let model_path = coverage_dir.join("grid.ply");
    let output_path = coverage_dir.join("grid_picked.ply");

    println!("Writing grid model");
    write_grid_model(&model_path, 16);

    println!("Running coverage...");

    cargo("llvm-cov clean --workspace");

    println!("Running 'pick' example");
    cargo(&format!(
        "llvm-cov run --example pick -- -m {} -c 640,360 -c 0,0 -o {}",
        model_path.display(),
        output_path.display(),
    ));

    println!("Running doctests");
    cargo("test --doc");

    println!("Running tests");
    cargo("llvm-cov --no-report nextest");

    println!("Generating coverage report");
    cargo(&format!(
        "llvm-cov report --lcov --output-path {}",
        lcov_path.display()
    ));

    println!("Generating badge");

    let lcov = std::fs::read_to_string(&lcov_path).expect("read lcov.info");
    let (covered, total) = line_coverage(&lcov);

    let percentage = match total {
        0 => 100,
        _ => (covered as f32 / total as f32 * 100.0).round() as u64,
    };

    let color = match percentage {
        80.. => "brightgreen",
        50.. => "yellow",
        _ => "red",
    };

    let badge_json = format!(
        "{{\n    \"schemaVersion\": 1,\n    \"label\": \"coverage\",\n    \"message\": \"{percentage}%\",\n    \"color\": \"{color}\"\n}}\n"
    );
    std::fs::write(&badge_path, badge_json).expect("write badge.json");

    println!("Done");
}

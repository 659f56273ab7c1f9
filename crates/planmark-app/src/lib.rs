//! Planmark Replay
//!
//! Loads a session file, drives the canvas engine through its scripted
//! pointer events and toolbar commands, and writes the final frame as SVG.

mod error;
mod replay;
mod session;

pub use error::{AppError, AppResult};
pub use replay::{Replay, ReplayReport};
pub use session::{ImageSpec, ResolvedImage, Session, Step};

use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Replay the session at `session_path` and write the rendered SVG to
/// `output`, or to stdout when no output path is given.
pub fn run(session_path: &Path, output: Option<&Path>) -> AppResult<ReplayReport> {
    let session = Session::load(session_path)?;
    let base_dir = session_path.parent().unwrap_or_else(|| Path::new("."));
    log::info!(
        "Loaded session {} ({} images, {} steps)",
        session_path.display(),
        session.images.len(),
        session.steps.len()
    );

    let mut replay = Replay::new(&session, base_dir)?;
    let report = replay.run(&session.steps)?;
    log::info!(
        "Replayed {} steps: image {} '{}', {} strokes, {} notes, scale {:.2}, revision {}",
        report.steps,
        report.image_index,
        report.image_name,
        report.strokes,
        report.notes,
        report.scale,
        report.revision
    );

    let svg = replay.render_svg()?;
    match output {
        Some(path) => {
            fs::write(path, svg).map_err(|source| AppError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            std::io::stdout()
                .write_all(svg.as_bytes())
                .map_err(|source| AppError::Io {
                    path: "<stdout>".into(),
                    source,
                })?;
        }
    }
    Ok(report)
}

/// Replay a Planmark session and render the final frame as SVG.
#[derive(Parser, Debug)]
#[command(name = "planmark", version, about)]
pub struct Args {
    /// Session file (JSON).
    pub session: PathBuf,
    /// Write the SVG here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["planmark", "plan.json", "-o", "out.svg"]).unwrap();
        assert_eq!(args.session, PathBuf::from("plan.json"));
        assert_eq!(args.output, Some(PathBuf::from("out.svg")));

        let args = Args::try_parse_from(["planmark", "plan.json", "--output", "b.svg"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("b.svg")));

        let args = Args::try_parse_from(["planmark", "plan.json"]).unwrap();
        assert_eq!(args.output, None);
    }

    #[test]
    fn test_args_errors() {
        assert!(Args::try_parse_from(["planmark"]).is_err());
        assert!(Args::try_parse_from(["planmark", "a.json", "-o"]).is_err());
        assert!(Args::try_parse_from(["planmark", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_run_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(400, 300).save(dir.path().join("T1.png")).unwrap();
        let session_path = dir.path().join("session.json");
        fs::write(
            &session_path,
            r#"{
                "config": { "viewport_size": { "width": 800.0, "height": 600.0 } },
                "images": [ { "path": "T1.png" } ],
                "steps": [
                    { "set_mode": "annotate" },
                    { "set_pen_color": "orange" },
                    { "pointer": { "down": { "position": { "x": 250.0, "y": 200.0 } } } },
                    { "pointer": { "move": { "position": { "x": 300.0, "y": 220.0 } } } },
                    { "pointer": { "up": { "position": { "x": 300.0, "y": 220.0 } } } }
                ]
            }"#,
        )
        .unwrap();
        let output = dir.path().join("out.svg");

        let report = run(&session_path, Some(&output)).unwrap();
        assert_eq!(report.image_name, "T1");
        assert_eq!(report.strokes, 1);

        let svg = fs::read_to_string(&output).unwrap();
        assert!(svg.contains(r#"href="T1.png""#));
        assert!(svg.contains(r##"stroke="#ffa500""##));
    }

    #[test]
    fn test_run_missing_session() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("nope.json"), None).unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
    }
}
